pub mod memory;
pub mod mongo_store;
pub mod pipelines;
pub mod store;

pub use memory::MemoryStore;
pub use mongo_store::MongoStore;
pub use store::Store;

use mongodb::{Client, Collection, Database};
use std::error::Error;
use std::sync::Arc;

use crate::config::Config;

pub const USERS: &str = "users";
pub const CLASSES: &str = "classes";
pub const BOOKED_CLASSES: &str = "bookedClasses";
pub const PAYMENTS: &str = "payments";

const DEFAULT_DB_NAME: &str = "ninjaSchool";
const MEMORY_SCHEME: &str = "memory://";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db_name = db_name
            .or_else(|| database_name_from_uri(uri))
            .unwrap_or(DEFAULT_DB_NAME);

        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };

        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the lookups and joins rely on.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::{doc, Document};
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS);
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(unique_email).await {
            Ok(_) => log::info!("   ✅ Index created: users(email, unique)"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let plain = [
            (CLASSES, "instructorEmail"),
            (CLASSES, "status"),
            (BOOKED_CLASSES, "studentEmail"),
            (PAYMENTS, "userEmail"),
        ];

        for (collection, field) in plain {
            let index = IndexModel::builder().keys(doc! { field: 1 }).build();

            match self.collection::<Document>(collection).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}({})", collection, field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

/// Extracts the path segment of `mongodb://host:port/<name>?opts`, if any.
fn database_name_from_uri(uri: &str) -> Option<&str> {
    let rest = uri.split_once("://").map(|(_, rest)| rest)?;
    let path = rest.split_once('/').map(|(_, path)| path)?;
    let name = path.split('?').next()?;

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Builds the process-wide store selected by `DATABASE_URL`.
pub async fn connect(config: &Config) -> Result<Arc<dyn Store>, Box<dyn Error>> {
    if config.database_url.starts_with(MEMORY_SCHEME) {
        log::warn!("🧪 Using in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db = MongoDB::new(&config.database_url, config.database_name.as_deref()).await?;
    Ok(Arc::new(MongoStore::new(db)))
}
