use crate::services::api_client::ApiClient;
use crate::services::resource::ResourceClient;
use std::fmt;
use std::sync::Arc;

/// Reference tables behind the dropdowns of the property screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum MasterTable {
    Countries,
    States,
    Cities,
    PropertyTypes,
    DocumentTypes,
    BhkTypes,
    OwnershipTypes,
    Documents,
}

impl MasterTable {
    pub const ALL: [MasterTable; 8] = [
        MasterTable::Countries,
        MasterTable::States,
        MasterTable::Cities,
        MasterTable::PropertyTypes,
        MasterTable::DocumentTypes,
        MasterTable::BhkTypes,
        MasterTable::OwnershipTypes,
        MasterTable::Documents,
    ];

    pub fn path(self) -> &'static str {
        match self {
            MasterTable::Countries => "/countries/",
            MasterTable::States => "/states/",
            MasterTable::Cities => "/cities/",
            MasterTable::PropertyTypes => "/property-types/",
            MasterTable::DocumentTypes => "/document-types/",
            MasterTable::BhkTypes => "/bhk-types/",
            MasterTable::OwnershipTypes => "/ownership-types/",
            MasterTable::Documents => "/documents/",
        }
    }
}

impl fmt::Display for MasterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_matches('/'))
    }
}

#[derive(Clone)]
pub struct MasterDataService {
    client: Arc<ApiClient>,
}

impl MasterDataService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// CRUD handle for one table. Rows stay opaque JSON.
    pub fn table(&self, table: MasterTable) -> ResourceClient {
        ResourceClient::new(self.client.clone(), table.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_are_collection_style() {
        for table in MasterTable::ALL {
            let path = table.path();
            assert!(path.starts_with('/') && path.ends_with('/'), "{}", path);
        }
        assert_eq!(MasterTable::BhkTypes.to_string(), "bhk-types");
    }
}
