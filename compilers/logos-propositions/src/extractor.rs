use logos_clauses::{detect_clauses, Clause};
use logos_graph::DependencyGraph;
use logos_protocol::{Configuration, ConfigurationError};
use tracing::debug;

use crate::error::GenerationResult;
use crate::generator::generate_propositions;
use crate::proposition::Proposition;

/// Clauses and propositions of one sentence.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub clauses: Vec<Clause>,
    pub propositions: Vec<Proposition>,
}

/// Runs detection and generation over parsed sentences with one validated configuration.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: Configuration,
}

impl Extractor {
    pub fn new(config: Configuration) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn detect(&self, graph: &DependencyGraph) -> GenerationResult<Vec<Clause>> {
        Ok(detect_clauses(graph, &self.config)?)
    }

    pub fn generate(&self, clauses: &[Clause]) -> GenerationResult<Vec<Proposition>> {
        generate_propositions(clauses, &self.config)
    }

    pub fn extract(&self, graph: &DependencyGraph) -> GenerationResult<Extraction> {
        let clauses = self.detect(graph)?;
        let propositions = self.generate(&clauses)?;
        debug!(
            target: "logos::extract",
            tokens = graph.len(),
            clauses = clauses.len(),
            propositions = propositions.len(),
            "sentence done"
        );
        Ok(Extraction {
            clauses,
            propositions,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            config: Configuration::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos_graph::fixtures::GraphBuilder;
    use logos_protocol::Relation;

    #[test]
    fn test_rejects_invalid_configuration() {
        let config = Configuration {
            min_optional_args: 2,
            max_optional_args: 1,
            ..Configuration::default()
        };
        assert_eq!(
            Extractor::new(config).unwrap_err(),
            ConfigurationError::InvalidBounds { min: 2, max: 1 }
        );
    }

    #[test]
    fn test_extract_sentence() {
        let graph = GraphBuilder::new()
            .token(1, "Bell", "Bell", "NNP")
            .token(2, "makes", "make", "VBZ")
            .token(3, "products", "product", "NNS")
            .edge(2, Relation::NominalSubject, 1)
            .edge(2, Relation::DirectObject, 3)
            .build();

        let extraction = Extractor::default().extract(&graph).unwrap();
        assert_eq!(extraction.clauses.len(), 1);
        assert_eq!(
            extraction.propositions,
            vec![Proposition::from_fields(["Bell", "makes", "products"])]
        );

        // an empty sentence has nothing to say
        let empty = Extractor::default().extract(&DependencyGraph::new()).unwrap();
        assert!(empty.clauses.is_empty());
        assert!(empty.propositions.is_empty());
    }
}
