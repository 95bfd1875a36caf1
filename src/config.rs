use crate::error::{
    BadEnvVarSnafu, InvalidCorsOriginSnafu, ParsePortSnafu, StudentsError, StudentsResult,
    UnknownStoreKindSnafu,
};
use axum::http::HeaderValue;
use dotenvy::var;
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::{env::VarError, str::FromStr, sync::Arc};

const DEFAULT_SERVER_IP: &str = "127.0.0.1:8090";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

fn optional_env_var(name: &'static str) -> StudentsResult<Option<String>> {
    match var(name) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(source) => Err(source).context(BadEnvVarSnafu { name }),
    }
}

fn env_var_or(name: &'static str, default: &str) -> StudentsResult<String> {
    Ok(optional_env_var(name)?.unwrap_or_else(|| default.to_string()))
}

#[derive(Clone, Debug, Default)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    server_config: Arc<ServerConfig>,
}

impl RuntimeConfiguration {
    pub fn new() -> StudentsResult<Self> {
        Ok(Self {
            db_config: Arc::new(DbConfig::new()?),
            server_config: Arc::new(ServerConfig::new()?),
        })
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }

    pub fn server_config(&self) -> Arc<ServerConfig> {
        self.server_config.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Mongo,
    Memory,
}

impl FromStr for StoreKind {
    type Err = StudentsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "in_memory" => Ok(Self::Memory),
            _ => UnknownStoreKindSnafu { found: s }.fail(),
        }
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    server_ip: String,
    cors_origin: HeaderValue,
    store_kind: StoreKind,
}

impl ServerConfig {
    pub fn new() -> StudentsResult<Self> {
        let origin = env_var_or("STUDENTS_CORS_ORIGIN", DEFAULT_CORS_ORIGIN)?;
        let cors_origin =
            HeaderValue::from_str(&origin).context(InvalidCorsOriginSnafu { origin })?;

        Ok(Self {
            server_ip: env_var_or("STUDENTS_SERVER_IP", DEFAULT_SERVER_IP)?,
            cors_origin,
            store_kind: optional_env_var("STUDENTS_STORE")?
                .map(|kind| kind.parse::<StoreKind>())
                .transpose()?
                .unwrap_or_default(),
        })
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }

    pub fn cors_origin(&self) -> HeaderValue {
        self.cors_origin.clone()
    }

    pub const fn store_kind(&self) -> StoreKind {
        self.store_kind
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_ip: DEFAULT_SERVER_IP.to_string(),
            cors_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            store_kind: StoreKind::default(),
        }
    }
}

#[derive(Debug)]
pub struct DbConfig {
    credentials: Option<(String, SecretString)>,
    path: String,
    port: u16,
    database: String,
    collection: String,
}

impl DbConfig {
    pub fn new() -> StudentsResult<Self> {
        let credentials = match (
            optional_env_var("DB_USER")?,
            optional_env_var("DB_PASSWORD")?,
        ) {
            (Some(user), Some(password)) => Some((user, SecretString::from(password))),
            (None, None) => None,
            _ => {
                warn!("only one of DB_USER and DB_PASSWORD is set, connecting without credentials");
                None
            }
        };

        Ok(Self {
            credentials,
            path: env_var_or("DB_PATH", "localhost")?,
            port: env_var_or("DB_PORT", "27017")?
                .parse()
                .context(ParsePortSnafu)?,
            database: env_var_or("DB_NAME", "students")?,
            collection: env_var_or("DB_COLLECTION", "students")?,
        })
    }

    pub fn get_db_uri(&self) -> String {
        match &self.credentials {
            Some((user, password)) => format!(
                "mongodb://{}:{}@{}:{}/",
                urlencoding::encode(user),
                urlencoding::encode(password.expose_secret()),
                self.path,
                self.port,
            ),
            None => format!("mongodb://{}:{}/", self.path, self.port),
        }
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

#[cfg(all(test, feature = "mongo-tests"))]
impl DbConfig {
    pub fn for_local_server(path: String, port: u16) -> Self {
        Self {
            path,
            port,
            ..Self::default()
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            path: "localhost".to_string(),
            port: 27017,
            database: "students".to_string(),
            collection: "students".to_string(),
        }
    }
}
