use mongodb::{Client, Database};

pub async fn get_db_client(database_url: &str, database_name: &str) -> Database {
    let client = Client::with_uri_str(database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db = client.database(database_name);

    match db.list_collection_names().await {
        Ok(collections) => {
            println!("✅ Connected to database: {}", database_name);
            println!("📂 Collections found: {:?}", collections);
        }
        Err(e) => {
            eprintln!(
                "❌ Database '{}' may not exist or is inaccessible: {}",
                database_name, e
            );
        }
    }

    db
}
