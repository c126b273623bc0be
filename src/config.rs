use crate::{
    error::{
        BadEnvVarSnafu, ParseAddressSnafu, ParsePortSnafu, RollcallResult,
        UnknownStoreBackendSnafu,
    },
    payment::PaymentProvider,
};
use secrecy::{ExposeSecret, SecretString};
use snafu::ResultExt;
use std::{env::VarError, net::SocketAddr, sync::Arc};

type Lookup<'a> = &'a dyn Fn(&'static str) -> Result<String, dotenvy::Error>;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    server_ip: SocketAddr,
    store: StoreBackend,
    payment_provider: PaymentProvider,
    app_info: Arc<AppInfo>,
}

#[derive(Clone, Debug)]
pub enum StoreBackend {
    Postgres(Arc<DbConfig>),
    InMemory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub description: String,
    pub author: String,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            description: "Rust Web Learning Project".to_string(),
            author: "Rollcall Contributors".to_string(),
        }
    }
}

fn get_env_var(lookup: Lookup, name: &'static str) -> RollcallResult<String> {
    lookup(name).context(BadEnvVarSnafu { name })
}

///`Ok(None)` if the variable just isn't there
fn get_optional_env_var(lookup: Lookup, name: &'static str) -> RollcallResult<Option<String>> {
    match lookup(name) {
        Ok(value) => Ok(Some(value)),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(None),
        Err(source) => Err(source).context(BadEnvVarSnafu { name }),
    }
}

impl RuntimeConfiguration {
    pub fn new() -> RollcallResult<Self> {
        Self::from_lookup(&|name| dotenvy::var(name))
    }

    pub fn from_lookup(lookup: Lookup) -> RollcallResult<Self> {
        let server_ip = get_optional_env_var(lookup, "ROLLCALL_SERVER_IP")?
            .unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let server_ip = server_ip
            .parse::<SocketAddr>()
            .context(ParseAddressSnafu { original: server_ip })?;

        let store = match get_optional_env_var(lookup, "STUDENT_STORE")?
            .as_deref()
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            None | Some("postgres") => StoreBackend::Postgres(Arc::new(DbConfig::new(lookup)?)),
            Some("memory") => StoreBackend::InMemory,
            Some(value) => return UnknownStoreBackendSnafu { value }.fail(),
        };

        let payment_provider = get_optional_env_var(lookup, "PAYMENT_PROVIDER")?
            .map(|value| value.parse::<PaymentProvider>())
            .transpose()?
            .unwrap_or_default();

        let defaults = AppInfo::default();
        let app_info = AppInfo {
            description: get_optional_env_var(lookup, "APP_DESCRIPTION")?
                .unwrap_or(defaults.description),
            author: get_optional_env_var(lookup, "APP_AUTHOR")?.unwrap_or(defaults.author),
        };

        Ok(Self {
            server_ip,
            store,
            payment_provider,
            app_info: Arc::new(app_info),
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            server_ip: SocketAddr::from(([127, 0, 0, 1], 8080)),
            store: StoreBackend::InMemory,
            payment_provider: PaymentProvider::default(),
            app_info: Arc::new(AppInfo::default()),
        }
    }

    pub const fn server_ip(&self) -> SocketAddr {
        self.server_ip
    }

    pub const fn store(&self) -> &StoreBackend {
        &self.store
    }

    pub const fn payment_provider(&self) -> PaymentProvider {
        self.payment_provider
    }

    pub fn app_info(&self) -> Arc<AppInfo> {
        self.app_info.clone()
    }
}

#[derive(Debug)]
pub struct DbConfig {
    user: String,
    password: SecretString,
    path: String,
    port: u16,
    database: String,
}

impl DbConfig {
    fn new(lookup: Lookup) -> RollcallResult<Self> {
        Ok(Self {
            user: get_env_var(lookup, "DB_USER")?,
            password: SecretString::from(get_env_var(lookup, "DB_PASSWORD")?),
            path: get_env_var(lookup, "DB_PATH")?,
            port: get_env_var(lookup, "DB_PORT")?
                .parse()
                .context(ParsePortSnafu)?,
            database: get_env_var(lookup, "DB_NAME")?,
        })
    }

    pub fn get_db_path(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user,
            self.password.expose_secret(),
            self.path,
            self.port,
            self.database
        )
    }
}
