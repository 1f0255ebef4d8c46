//! Data sources: databases and files a project imports schemas from.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use synthdata_foundation::DataSourceId;

/// Broad category of a data source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataSourceKind {
    /// A database reachable through a driver.
    Database,
    /// An uploaded file (CSV, JSON, SQLite).
    File,
}

/// A data source attached to a project.
///
/// Fields are kind-specific: databases carry connection details, files carry
/// file metadata. The password never leaves the server.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DataSource {
    id: DataSourceId,
    #[cfg_attr(feature = "serde", serde(default))]
    file_name: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    mime_type: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    driver: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    db: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    usr: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    host: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    port: Option<u16>,
}

impl DataSource {
    /// Creates a database data source.
    #[must_use]
    pub fn database(id: DataSourceId, driver: impl Into<String>, db: impl Into<String>) -> Self {
        Self {
            id,
            file_name: None,
            mime_type: None,
            driver: Some(driver.into()),
            db: Some(db.into()),
            usr: None,
            host: None,
            port: None,
        }
    }

    /// Creates a file data source.
    #[must_use]
    pub fn file(id: DataSourceId, file_name: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            id,
            file_name: Some(file_name.into()),
            mime_type: Some(mime_type.into()),
            driver: None,
            db: None,
            usr: None,
            host: None,
            port: None,
        }
    }

    /// Sets the connection endpoint.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = Some(host.into());
        self.port = Some(port);
        self
    }

    /// Sets the connecting user.
    #[must_use]
    pub fn with_user(mut self, usr: impl Into<String>) -> Self {
        self.usr = Some(usr.into());
        self
    }

    /// Returns the data source id.
    #[must_use]
    pub fn id(&self) -> DataSourceId {
        self.id
    }

    /// Returns the kind of this data source.
    ///
    /// A source carrying a file name is a file, even when it also names a
    /// driver (SQLite uploads).
    #[must_use]
    pub fn kind(&self) -> DataSourceKind {
        if self.file_name.is_some() {
            DataSourceKind::File
        } else {
            DataSourceKind::Database
        }
    }

    /// Returns the uploaded file name.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Returns the uploaded file's MIME type.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// Returns the database driver name.
    #[must_use]
    pub fn driver(&self) -> Option<&str> {
        self.driver.as_deref()
    }

    /// Returns the database name.
    #[must_use]
    pub fn db(&self) -> Option<&str> {
        self.db.as_deref()
    }

    /// Returns the connecting user.
    #[must_use]
    pub fn usr(&self) -> Option<&str> {
        self.usr.as_deref()
    }

    /// Returns the database host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the database port.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}
