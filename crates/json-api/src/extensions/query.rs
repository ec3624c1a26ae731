//! Optional query parameter parsing.

use std::{fmt::Display, str::FromStr};

use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

pub(crate) trait OptionalQueryExt {
    /// Parse a present, non-blank value; absent or blank values are `None`.
    fn parse_optional<T>(self, name: &str) -> Result<Option<T>, StatusError>
    where
        T: FromStr,
        T::Err: Display;
}

impl OptionalQueryExt for QueryParam<String, false> {
    fn parse_optional<T>(self, name: &str) -> Result<Option<T>, StatusError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.into_inner()
            .filter(|value| !value.trim().is_empty())
            .map(|value| value.trim().parse::<T>())
            .transpose()
            .or_400(&format!("could not parse \"{name}\" query parameter"))
    }
}
