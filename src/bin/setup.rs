use ncnews::{
    config::Config,
    storage::{migrate, new_db_pool},
};

const DEFAULT_SCHEMA: &str = "sql/01-CREATE_TABLE.sql";

fn print_usage_and_exit() -> ! {
    eprintln!("Usage: setup [<file.sql>...]");
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let mut files: Vec<String> = std::env::args().skip(1).collect();
    if files.iter().any(|f| f == "-h" || f == "--help") {
        print_usage_and_exit();
    }
    if files.is_empty() {
        files.push(DEFAULT_SCHEMA.to_string());
    }

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    });

    let pool = new_db_pool(&config.database_url, 1)
        .await
        .unwrap_or_else(|e| {
            eprintln!("❌ Failed to connect database: {}", e);
            std::process::exit(1);
        });

    for file in &files {
        match migrate(&pool, file).await {
            Ok(()) => println!("✅ Applied {}", file),
            Err(e) => {
                eprintln!("❌ Failed to apply {}: {}", file, e);
                pool.close().await;
                std::process::exit(1);
            }
        }
    }

    pool.close().await;
}
