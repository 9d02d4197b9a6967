use std::time::Duration;

use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions, Tls};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::error::AppError;
use crate::models::account::Account;
use crate::models::application::Application;
use crate::models::posting::Posting;
use crate::models::profile::Profile;
use crate::models::session::SessionRecord;

pub const ACCOUNTS: &str = "usuarios";
pub const POSTINGS: &str = "vagas";
pub const PROFILES: &str = "candidatos";
pub const APPLICATIONS: &str = "aplicacoes";
pub const SESSIONS: &str = "sessoes";

pub const POSTINGS_SEARCH_INDEX: &str = "search_index_vagas";
pub const PROFILES_SEARCH_INDEX: &str = "search_index_candidatos";

/// Handle over the job-board database. Cheap to clone; the driver pools
/// connections internally.
#[derive(Clone)]
pub struct Db {
    database: Database,
}

/// Connect, verify with a ping and return the database handle.
pub async fn connect(uri: &str, database_name: &str) -> anyhow::Result<Db> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some("jobboard".to_string());

    // The managed cluster presents a certificate chain some hosts reject.
    if let Some(Tls::Enabled(ref mut tls)) = options.tls {
        tls.allow_invalid_certificates = Some(true);
    }

    let client = Client::with_options(options)?;
    let database = client.database(database_name);
    database.run_command(doc! { "ping": 1 }).await?;

    Ok(Db { database })
}

impl Db {
    pub fn accounts(&self) -> Collection<Account> {
        self.database.collection(ACCOUNTS)
    }

    pub fn postings(&self) -> Collection<Posting> {
        self.database.collection(POSTINGS)
    }

    pub fn profiles(&self) -> Collection<Profile> {
        self.database.collection(PROFILES)
    }

    pub fn applications(&self) -> Collection<Application> {
        self.database.collection(APPLICATIONS)
    }

    pub fn sessions(&self) -> Collection<SessionRecord> {
        self.database.collection(SESSIONS)
    }

    /// Untyped view of a collection, for search projections and aggregations.
    pub fn raw(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Create every index the application relies on. Safe to re-run: the
    /// server treats an identical definition as a no-op.
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let postings_text = IndexModel::builder()
            .keys(doc! {
                "titulo": "text",
                "descricao": "text",
                "requisitos": "text",
                "skills": "text",
            })
            .options(
                IndexOptions::builder()
                    .name(POSTINGS_SEARCH_INDEX.to_string())
                    .build(),
            )
            .build();
        self.raw(POSTINGS).create_index(postings_text).await?;

        let profiles_text = IndexModel::builder()
            .keys(doc! {
                "resumo": "text",
                "skills": "text",
                "experiencia": "text",
                "formacao": "text",
                "nome": "text",
            })
            .options(
                IndexOptions::builder()
                    .name(PROFILES_SEARCH_INDEX.to_string())
                    .build(),
            )
            .build();
        self.raw(PROFILES).create_index(profiles_text).await?;

        let unique_username = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.raw(ACCOUNTS).create_index(unique_username).await?;

        // One application per candidate per posting.
        let unique_application = IndexModel::builder()
            .keys(doc! { "vaga_id": 1, "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.raw(APPLICATIONS)
            .create_index(unique_application)
            .await?;

        let unique_token = IndexModel::builder()
            .keys(doc! { "token_hash": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.raw(SESSIONS).create_index(unique_token).await?;

        // Let the server reap expired sessions.
        let session_expiry = IndexModel::builder()
            .keys(doc! { "expira_em": 1 })
            .options(
                IndexOptions::builder()
                    .expire_after(Duration::from_secs(0))
                    .build(),
            )
            .build();
        self.raw(SESSIONS).create_index(session_expiry).await?;

        Ok(())
    }

    /// Drop and rebuild the two full-text indexes, then re-ensure the rest.
    /// Used by the `create-indexes` subcommand after schema changes.
    pub async fn recreate_search_indexes(&self) -> anyhow::Result<()> {
        for (collection, name) in [
            (POSTINGS, POSTINGS_SEARCH_INDEX),
            (PROFILES, PROFILES_SEARCH_INDEX),
        ] {
            match self.raw(collection).drop_index(name).await {
                Ok(()) => tracing::info!("Dropped index {name} on {collection}"),
                Err(e) => tracing::debug!("No index {name} to drop on {collection}: {e}"),
            }
        }
        self.ensure_indexes().await
    }
}
