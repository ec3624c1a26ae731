use clap::{Args, ValueEnum};
use jiff::{Timestamp, ToSpan};
use rust_decimal::Decimal;
use shopfusion_app::{
    database::{self, Db},
    domain::promo_codes::{
        PgPromoCodesService, PromoCodesService,
        data::NewPromoCode,
        records::{DiscountRule, PromoCodeUuid},
    },
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DiscountKind {
    Percentage,
    Fixed,
}

#[derive(Debug, Args)]
pub(crate) struct CreatePromoArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Code customers type at checkout
    #[arg(long)]
    code: String,

    #[arg(long, value_enum)]
    discount_type: DiscountKind,

    /// Percent off, or a fixed amount off
    #[arg(long)]
    value: Decimal,

    /// Minimum order subtotal
    #[arg(long, default_value_t = Decimal::ZERO)]
    minimum_amount: Decimal,

    /// Start of the validity window (RFC 3339); defaults to now
    #[arg(long)]
    valid_from: Option<String>,

    /// End of the validity window (RFC 3339); defaults to 30 days after start
    #[arg(long)]
    valid_until: Option<String>,

    /// Create the code switched off
    #[arg(long)]
    inactive: bool,
}

pub(crate) async fn run(args: CreatePromoArgs) -> Result<(), String> {
    let valid_from = parse_timestamp("valid-from", args.valid_from.as_deref())?
        .unwrap_or_else(Timestamp::now);

    let valid_until = match parse_timestamp("valid-until", args.valid_until.as_deref())? {
        Some(until) => until,
        None => valid_from
            .checked_add(720.hours())
            .map_err(|error| format!("invalid validity window: {error}"))?,
    };

    let discount = match args.discount_type {
        DiscountKind::Percentage => DiscountRule::Percentage {
            percent: args.value,
        },
        DiscountKind::Fixed => DiscountRule::FixedAmount { amount: args.value },
    };

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let promo = PgPromoCodesService::new(Db::new(pool))
        .create_promo_code(NewPromoCode {
            uuid: PromoCodeUuid::new(),
            code: args.code,
            discount,
            minimum_amount: args.minimum_amount,
            valid_from,
            valid_until,
            is_active: !args.inactive,
        })
        .await
        .map_err(|error| format!("failed to create promo code: {error}"))?;

    println!("promo_code_uuid: {}", promo.uuid);
    println!("code: {}", promo.code);
    println!("discount_type: {}", promo.discount.to_str());
    println!("discount_value: {}", promo.discount.value());
    println!("minimum_amount: {}", promo.minimum_amount);
    println!("valid_from: {}", promo.valid_from);
    println!("valid_until: {}", promo.valid_until);
    println!("is_active: {}", promo.is_active);

    Ok(())
}

fn parse_timestamp(flag: &str, raw: Option<&str>) -> Result<Option<Timestamp>, String> {
    raw.map(|value| {
        value
            .parse::<Timestamp>()
            .map_err(|error| format!("invalid {flag} timestamp: {error}"))
    })
    .transpose()
}
