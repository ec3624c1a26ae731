use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct PromoCommand {
    #[command(subcommand)]
    command: PromoSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoSubcommand {
    Create(create::CreatePromoArgs),
}

pub(crate) async fn run(command: PromoCommand) -> Result<(), String> {
    match command.command {
        PromoSubcommand::Create(args) => create::run(args).await,
    }
}
