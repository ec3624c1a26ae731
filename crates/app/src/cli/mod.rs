use clap::{Parser, Subcommand};

mod db;
mod product;
mod promo;
mod token;
mod user;

#[derive(Debug, Parser)]
#[command(name = "shopfusion-app", about = "Shopfusion CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(user::UserCommand),
    Token(token::TokenCommand),
    Product(product::ProductCommand),
    Promo(promo::PromoCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::User(command) => user::run(command).await,
            Commands::Token(command) => token::run(command).await,
            Commands::Product(command) => product::run(command).await,
            Commands::Promo(command) => promo::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
