use clap::Args;
use rust_decimal::Decimal;
use shopfusion_app::{
    database::{self, Db},
    domain::products::{PgProductsService, ProductsService, data::NewProduct, records::ProductUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Product display name
    #[arg(long)]
    name: String,

    /// Unit price, e.g. `25.00`
    #[arg(long)]
    price: Decimal,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    stock: u32,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    if args.price.is_sign_negative() {
        return Err("price cannot be negative".to_string());
    }

    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let product = PgProductsService::new(Db::new(pool))
        .create_product(NewProduct {
            uuid: ProductUuid::new(),
            name: args.name,
            price: args.price.round_dp(2),
            stock_quantity: args.stock,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("name: {}", product.name);
    println!("price: {}", product.price);
    println!("stock_quantity: {}", product.stock_quantity);

    Ok(())
}
