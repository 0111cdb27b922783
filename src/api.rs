use crate::{
    config::Config,
    database::Database,
    network::{EmailTransport, Network},
};
use handlebars::Handlebars;

pub struct Api<ET: EmailTransport> {
    pub db: Database,
    pub config: Config,
    pub network: Network<ET>,
    pub templates: Handlebars<'static>,
}

impl<ET: EmailTransport> Api<ET> {
    /// Instantiates APIs collection with the specified config and datastore.
    pub fn new(
        config: Config,
        database: Database,
        network: Network<ET>,
        templates: Handlebars<'static>,
    ) -> Self {
        Self {
            config,
            db: database,
            network,
            templates,
        }
    }
}

impl<ET: EmailTransport> AsRef<Api<ET>> for Api<ET> {
    fn as_ref(&self) -> &Self {
        self
    }
}
