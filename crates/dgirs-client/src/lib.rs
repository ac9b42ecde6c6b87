//! dgirs-client — GraphQL queries against DGIdb and flattening of the
//! responses into row-oriented records.
//!
//! Also hosts the clients for the services DGIdb results are commonly joined
//! with (openFDA, ClinicalTrials.gov, Ensembl) and the process-wide gene list
//! cache used by the dashboard.

pub mod gene_list;
pub mod graphql;
pub mod models;
pub mod normalise;
pub mod queries;
pub mod sources;
pub mod vcf;

pub use gene_list::{GeneList, GeneListCache};
pub use models::*;
pub use sources::dgidb::DgidbClient;
pub use sources::InteractionSource;
