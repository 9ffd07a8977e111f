//! Business logic services

pub mod catalog;
pub mod notifier;
pub mod reconcile;
pub mod reviews;
pub mod workflow;

use std::sync::Arc;

use crate::{remote::RemoteGateway, repository::Repository};

use notifier::ChangeNotifier;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub reviews: reviews::ReviewsService,
    pub catalog_entries: workflow::CatalogEntryWorkflow,
    pub notifier: ChangeNotifier,
    remote: Arc<dyn RemoteGateway>,
}

impl Services {
    /// Create all services over the local repository and remote gateway
    pub fn new(repository: Repository, remote: Arc<dyn RemoteGateway>, notifier: ChangeNotifier) -> Self {
        let reviews = reviews::ReviewsService::new(repository.clone(), remote.clone(), notifier.clone());
        Self {
            catalog: catalog::CatalogService::new(
                repository.clone(),
                remote.clone(),
                notifier.clone(),
                reviews.clone(),
            ),
            catalog_entries: workflow::CatalogEntryWorkflow::new(repository, remote.clone(), notifier.clone()),
            reviews,
            notifier,
            remote,
        }
    }

    /// Whether writes are attempted remotely at all
    pub fn remote_configured(&self) -> bool {
        self.remote.is_configured()
    }
}
