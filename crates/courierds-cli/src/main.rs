use clap::{Parser, Subcommand};
use courierds_cli::admin::create_admin;
use courierds_cli::seeder::{self, SeedConfig};
use courierds_config::DatabaseConfig;
use courierds_db::init_db_pool;
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use sqlx::PgPool;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "courierds-cli")]
#[command(about = "CourierDS CLI - Administrative tools for CourierDS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an admin account
    CreateAdmin {
        #[arg(short = 'u', long)]
        username: Option<String>,

        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Seed the database with fake users and dispatcher applications
    Seed {
        /// Number of users to create
        #[arg(short = 'u', long, default_value = "50")]
        users: usize,

        /// Number of pending applications, filed by the first seeded users
        #[arg(short = 'a', long, default_value = "10")]
        applications: usize,
    },
    /// Delete all seeded accounts and their applications
    ClearSeed,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let cli = Cli::parse();

    let mut db_config = DatabaseConfig::from_env();
    db_config.max_connections = 5;

    let pool = match init_db_pool(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("❌ Failed to connect to database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => handle_create_admin(&pool, username, email, password).await,
        Commands::Seed {
            users,
            applications,
        } => seeder::seed_all(&pool, SeedConfig::new(users).with_applications(applications)).await,
        Commands::ClearSeed => seeder::clear_all(&pool).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email address").interact_text()?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
    };

    let id = create_admin(pool, &username, &email, &password).await?;

    println!("\n✅ Admin created successfully!");
    println!("   Id: {}", id);
    println!("   Username: {}", username.trim());
    println!("   Email: {}", email.trim().to_lowercase());
    Ok(())
}
