use crate::models::{LinkPageConfig, LinkSection, SocialLink};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::SqlitePool;

/// The external key-value persistence contract: get/set a value by entity id
/// plus field name. In the source system this is the platform's meta store;
/// here a SQLite table stands in so the repo runs end-to-end.
#[async_trait]
pub trait FieldStore: Send + Sync {
    async fn get_field(&self, page_id: i64, field: &str) -> Result<Option<String>, sqlx::Error>;
    async fn set_field(&self, page_id: i64, field: &str, value: &str) -> Result<(), sqlx::Error>;
}

pub struct SqliteFieldStore {
    pool: SqlitePool,
}

impl SqliteFieldStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FieldStore for SqliteFieldStore {
    async fn get_field(&self, page_id: i64, field: &str) -> Result<Option<String>, sqlx::Error> {
        let value: Option<(String,)> =
            sqlx::query_as("SELECT value FROM page_fields WHERE page_id = ?1 AND field = ?2")
                .bind(page_id)
                .bind(field)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value.map(|(v,)| v))
    }

    async fn set_field(&self, page_id: i64, field: &str, value: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO page_fields (page_id, field, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(page_id, field) DO UPDATE SET value = excluded.value",
        )
        .bind(page_id)
        .bind(field)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

// ── Config mapping ─────────────────────────────────────────────────────────
//
// Each top-level config section is one field, stored as JSON. A missing or
// malformed field loads as its built-in default (logged, never fatal), so
// resolve() keeps working against whatever was last saved cleanly.

const FIELD_ARTIST_ID: &str = "artist_id";
const SECTION_FIELDS: [&str; 9] = [
    "display",
    "background",
    "colors",
    "typography",
    "layout",
    "subscribe",
    "advanced",
    "socials",
    "link_sections",
];

pub async fn load_config<S: FieldStore + ?Sized>(
    store: &S,
    page_id: i64,
) -> Result<Option<LinkPageConfig>, sqlx::Error> {
    let artist_id = match store.get_field(page_id, FIELD_ARTIST_ID).await? {
        Some(raw) => raw.parse::<i64>().unwrap_or(0),
        None => return Ok(None),
    };

    let mut config = LinkPageConfig::new(page_id, artist_id);
    config.display = load_section(store, page_id, "display").await?;
    config.background = load_section(store, page_id, "background").await?;
    config.colors = load_section(store, page_id, "colors").await?;
    config.typography = load_section(store, page_id, "typography").await?;
    config.layout = load_section(store, page_id, "layout").await?;
    config.subscribe = load_section(store, page_id, "subscribe").await?;
    config.advanced = load_section(store, page_id, "advanced").await?;
    config.socials = load_section::<Vec<SocialLink>, _>(store, page_id, "socials").await?;
    config.link_sections =
        load_section::<Vec<LinkSection>, _>(store, page_id, "link_sections").await?;

    Ok(Some(config))
}

pub async fn save_config<S: FieldStore + ?Sized>(
    store: &S,
    config: &LinkPageConfig,
) -> Result<(), sqlx::Error> {
    store
        .set_field(config.id, FIELD_ARTIST_ID, &config.artist_id.to_string())
        .await?;
    save_section(store, config.id, "display", &config.display).await?;
    save_section(store, config.id, "background", &config.background).await?;
    save_section(store, config.id, "colors", &config.colors).await?;
    save_section(store, config.id, "typography", &config.typography).await?;
    save_section(store, config.id, "layout", &config.layout).await?;
    save_section(store, config.id, "subscribe", &config.subscribe).await?;
    save_section(store, config.id, "advanced", &config.advanced).await?;
    save_section(store, config.id, "socials", &config.socials).await?;
    save_section(store, config.id, "link_sections", &config.link_sections).await?;
    Ok(())
}

async fn load_section<T, S>(store: &S, page_id: i64, field: &str) -> Result<T, sqlx::Error>
where
    T: DeserializeOwned + Default,
    S: FieldStore + ?Sized,
{
    debug_assert!(SECTION_FIELDS.contains(&field));
    Ok(match store.get_field(page_id, field).await? {
        Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(
                "page {}: malformed '{}' field, using defaults: {}",
                page_id,
                field,
                e
            );
            T::default()
        }),
        None => T::default(),
    })
}

async fn save_section<T, S>(
    store: &S,
    page_id: i64,
    field: &str,
    value: &T,
) -> Result<(), sqlx::Error>
where
    T: Serialize,
    S: FieldStore + ?Sized,
{
    // Serializing our own section types cannot fail in practice; degrade to
    // skipping the field rather than aborting the whole save.
    match serde_json::to_string(value) {
        Ok(json) => store.set_field(page_id, field, &json).await,
        Err(e) => {
            tracing::error!("page {}: could not serialize '{}': {}", page_id, field, e);
            Ok(())
        }
    }
}
