use api_data::{
    dtos::order::{NewCustomerRequest, NewOrderRequest, NewProductRequest},
    services::{order, stats},
};
use assistant::{EmailContext, services as drafts};
use base64::{Engine, engine::general_purpose};
use clap::{Args, Subcommand, ValueEnum, builder::PossibleValuesParser};
use colored::Colorize;
use common::error::{AppError, Res};
use db::models::{
    customer::Customer,
    order::{Order, OrderStatus, PAYMENT_METHODS},
    product::Product,
};
use std::{fs, path::Path};

use crate::context::AppContext;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and sign in
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Revenue, order status breakdown and low-stock products
    Dashboard,
    #[command(subcommand)]
    Orders(OrdersCommand),
    #[command(subcommand)]
    Customers(CustomersCommand),
    #[command(subcommand)]
    Products(ProductsCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommand {
    List,
    /// Create an order for the selected products
    Create {
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        customer_email: String,
        #[arg(
            long,
            default_value = "Credit Card",
            ignore_case = true,
            value_parser = PossibleValuesParser::new(PAYMENT_METHODS)
        )]
        payment_method: String,
        /// Product id, repeat for several products
        #[arg(long = "product", required = true)]
        product_ids: Vec<String>,
    },
    /// Change the status of an order
    Status {
        order_id: String,
        #[arg(value_parser = parse_status)]
        status: OrderStatus,
    },
    /// Print the id the next order will get
    NextId,
    /// Draft a customer email about an order
    Email {
        order_id: String,
        #[arg(long, value_enum, default_value_t = ContextArg::ShippingDelay)]
        context: ContextArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomersCommand {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Order history and totals for one customer email
    Stats { email: String },
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommand {
    List,
    Add(ProductArgs),
    /// Replace fields of an existing product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        stock: Option<i64>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Draft a product description, optionally saving it
    Describe {
        id: String,
        #[arg(long, default_value = "")]
        keywords: String,
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug)]
pub struct ProductArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    sku: String,
    #[arg(long, default_value = "")]
    category: String,
    #[arg(long)]
    price: f64,
    #[arg(long, default_value_t = 0)]
    stock: i64,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    Show,
    /// Set the company display name
    Name { name: String },
    /// Set the logo from an image file, or remove it when no file is given
    Logo { path: Option<std::path::PathBuf> },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ContextArg {
    ShippingDelay,
    ThankYou,
    PaymentIssue,
    Refund,
    Shipped,
}

impl From<ContextArg> for EmailContext {
    fn from(arg: ContextArg) -> Self {
        match arg {
            ContextArg::ShippingDelay => EmailContext::ShippingDelay,
            ContextArg::ThankYou => EmailContext::ThankYou,
            ContextArg::PaymentIssue => EmailContext::PaymentIssue,
            ContextArg::Refund => EmailContext::RefundConfirmation,
            ContextArg::Shipped => EmailContext::ShippingConfirmation,
        }
    }
}

fn parse_status(s: &str) -> Result<OrderStatus, String> {
    OrderStatus::parse(s).ok_or_else(|| {
        let names: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
        format!("expected one of {}", names.join(", "))
    })
}

pub async fn run(ctx: &mut AppContext, command: Command) -> Res<()> {
    match command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            if !ctx.signup(&name, &email, &password).await {
                return Err(AppError::Conflict(
                    "Could not create the account. The email may already be registered."
                        .to_string(),
                ));
            }
            println!("{} Welcome, {}", "✓".green(), name);
        }
        Command::Login { email, password } => {
            if !ctx.login(&email, &password).await {
                return Err(AppError::Unauthorized(
                    "Invalid email or password".to_string(),
                ));
            }
            let user = ctx.session.require_user()?;
            println!("{} Signed in as {} <{}>", "✓".green(), user.name, user.email);
        }
        Command::Logout => {
            ctx.logout();
            println!("Signed out");
        }
        Command::Whoami => {
            let user = ctx.session.require_user()?;
            println!("{} <{}> ({})", user.name, user.email, user.id);
        }
        Command::Dashboard => dashboard(ctx)?,
        Command::Orders(cmd) => orders(ctx, cmd).await?,
        Command::Customers(cmd) => customers(ctx, cmd)?,
        Command::Products(cmd) => products(ctx, cmd).await?,
        Command::Settings(cmd) => settings(ctx, cmd)?,
    }
    Ok(())
}

fn dashboard(ctx: &AppContext) -> Res<()> {
    let data = ctx.data()?;
    let summary = stats::dashboard_stats(data.orders(), data.products());

    println!("{}", ctx.settings.company_name().bold());
    println!("Total revenue     ₹{:.2}", summary.total_revenue);
    println!("Orders            {}", summary.total_orders);
    println!("Avg. order value  ₹{:.2}", summary.avg_order_value);
    println!("Customers         {}", data.customers().len());
    for (status, count) in &summary.status_counts {
        println!("  {:<12} {}", status.as_str(), count);
    }
    if summary.low_stock.is_empty() {
        println!("All products are well stocked.");
    } else {
        println!("{}", "Low stock".yellow());
        for product in &summary.low_stock {
            println!("  {:<30} {:<12} {} left", product.name, product.sku, product.stock);
        }
    }
    Ok(())
}

async fn orders(ctx: &mut AppContext, cmd: OrdersCommand) -> Res<()> {
    match cmd {
        OrdersCommand::List => {
            for o in ctx.data()?.orders() {
                print_order(o);
            }
        }
        OrdersCommand::Create {
            customer_name,
            customer_email,
            payment_method,
            product_ids,
        } => {
            let created = order::create_order(
                ctx.data_mut()?,
                &NewOrderRequest {
                    customer_name,
                    customer_email,
                    payment_method,
                    product_ids,
                },
            )?;
            print_order(&created);
        }
        OrdersCommand::Status { order_id, status } => {
            if !ctx.data_mut()?.update_order_status(&order_id, status) {
                return Err(AppError::NotFound(format!("Order {}", order_id)));
            }
            println!("{} is now {}", order_id, status);
        }
        OrdersCommand::NextId => println!("{}", ctx.data()?.next_order_id()),
        OrdersCommand::Email { order_id, context } => {
            let found = ctx
                .data()?
                .find_order(&order_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))?;
            let context = EmailContext::from(context);
            let text = drafts::generate_customer_email(
                ctx.generator.as_ref(),
                &found.customer_name,
                &found.id,
                found.status.as_str(),
                context.as_str(),
            )
            .await;
            println!("{} for {}\n", context.label().bold(), found.id);
            println!("{}", text);
        }
    }
    Ok(())
}

fn customers(ctx: &mut AppContext, cmd: CustomersCommand) -> Res<()> {
    match cmd {
        CustomersCommand::List { search } => {
            let data = ctx.data()?;
            let term = search.unwrap_or_default();
            for c in stats::search_customers(data.customers(), &term) {
                let history = stats::customer_stats(data.orders(), &c.email);
                print_customer(c, history.order_count, history.total_spent);
            }
        }
        CustomersCommand::Add {
            name,
            email,
            phone,
            location,
        } => {
            let created = order::create_customer(
                ctx.data_mut()?,
                &NewCustomerRequest {
                    name,
                    email,
                    phone,
                    location,
                },
            )?;
            print_customer(&created, 0, 0.0);
        }
        CustomersCommand::Stats { email } => {
            let history = stats::customer_stats(ctx.data()?.orders(), &email);
            println!("Orders       {}", history.order_count);
            println!("Total spent  ₹{:.2}", history.total_spent);
            println!(
                "Last order   {}",
                history.last_order_date.as_deref().unwrap_or("N/A")
            );
            for o in &history.orders {
                print_order(o);
            }
        }
    }
    Ok(())
}

async fn products(ctx: &mut AppContext, cmd: ProductsCommand) -> Res<()> {
    match cmd {
        ProductsCommand::List => {
            for p in ctx.data()?.products() {
                print_product(p);
            }
        }
        ProductsCommand::Add(args) => {
            let created = order::create_product(
                ctx.data_mut()?,
                &NewProductRequest {
                    name: args.name,
                    sku: args.sku,
                    category: args.category,
                    price: args.price,
                    stock: args.stock,
                    description: args.description,
                },
            )?;
            print_product(&created);
        }
        ProductsCommand::Update {
            id,
            name,
            sku,
            category,
            price,
            stock,
            description,
        } => {
            let data = ctx.data_mut()?;
            let mut product = data
                .find_product(&id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;
            if let Some(name) = name {
                product.name = name;
            }
            if let Some(sku) = sku {
                product.sku = sku;
            }
            if let Some(category) = category {
                product.category = category;
            }
            if let Some(price) = price {
                product.price = price;
            }
            if let Some(stock) = stock {
                product.stock = stock;
            }
            if let Some(description) = description {
                product.description = description;
            }
            data.update_product(product.clone());
            print_product(&product);
        }
        ProductsCommand::Describe { id, keywords, save } => {
            let product = ctx
                .data()?
                .find_product(&id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;
            let text = drafts::generate_product_description(
                ctx.generator.as_ref(),
                &product.name,
                &product.category,
                &keywords,
            )
            .await;
            println!("{}", text);

            if save {
                if drafts::is_placeholder(&text) {
                    return Err(AppError::BadRequest(
                        "Nothing was generated, description left unchanged".to_string(),
                    ));
                }
                order::apply_description(ctx.data_mut()?, &id, &text)?;
                println!("{} Saved description for {}", "✓".green(), product.name);
            }
        }
    }
    Ok(())
}

fn settings(ctx: &mut AppContext, cmd: SettingsCommand) -> Res<()> {
    match cmd {
        SettingsCommand::Show => {
            println!("Company  {}", ctx.settings.company_name());
            match ctx.settings.logo() {
                Some(logo) => println!("Logo     {} bytes", logo.len()),
                None => println!("Logo     none"),
            }
        }
        SettingsCommand::Name { name } => {
            common::misc::require_non_blank("Company name", &name)?;
            ctx.settings.set_company_name(&name)?;
            println!("Company name set to {}", name);
        }
        SettingsCommand::Logo { path } => match path {
            Some(path) => {
                let uri = logo_data_uri(&path)?;
                ctx.settings.set_logo(Some(uri))?;
                println!("Logo updated from {}", path.display());
            }
            None => {
                ctx.settings.set_logo(None)?;
                println!("Logo removed");
            }
        },
    }
    Ok(())
}

/// Reads an image file into a `data:` URI.
pub fn logo_data_uri(path: &Path) -> Res<String> {
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => {
            return Err(AppError::BadRequest(format!(
                "Unsupported logo format: {}",
                path.display()
            )));
        }
    };
    let bytes = fs::read(path)?;
    Ok(format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    ))
}

fn print_order(o: &Order) {
    let status = match o.status {
        OrderStatus::Delivered => o.status.as_str().green(),
        OrderStatus::Processing => o.status.as_str().blue(),
        OrderStatus::Shipped => o.status.as_str().cyan(),
        OrderStatus::Pending => o.status.as_str().yellow(),
        OrderStatus::Cancelled => o.status.as_str().red(),
    };
    println!(
        "{:<11} {:<10} {:<20} {:<16} ₹{:>9.2}  {}",
        o.id, o.date, o.customer_name, o.payment_method, o.total, status
    );
}

fn print_customer(c: &Customer, order_count: usize, total_spent: f64) {
    println!(
        "{:<16} {:<20} {:<28} {:<18} {:?} {:>3} orders ₹{:.2}",
        c.id, c.name, c.email, c.location, c.status, order_count, total_spent
    );
}

fn print_product(p: &Product) {
    println!(
        "{:<16} {:<30} {:<12} {:<12} ₹{:>8.2} {:>5} in stock",
        p.id, p.name, p.sku, p.category, p.price, p.stock
    );
    if !p.description.is_empty() {
        println!("    {}", p.description);
    }
}
