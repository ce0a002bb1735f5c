use std::collections::HashMap;

use crate::{HarnessErr, Result, model::Model};

/// An immutable table of the models a harness can evaluate, keyed by name.
///
/// Built once before any trial runs and shared read-only afterwards.
#[derive(Default)]
pub struct ModelRegistry {
    models: HashMap<String, Box<dyn Model>>,
    /// Alternative names, mapped to the registered name they stand for.
    aliases: HashMap<String, String>,
}

impl ModelRegistry {
    /// Returns an empty `ModelRegistry`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `model` under its own name, replacing any earlier entry with that name.
    pub fn with<M: Model + 'static>(mut self, model: M) -> Self {
        self.models.insert(model.name().to_string(), Box::new(model));
        self
    }

    /// Makes `alias` resolve to the model registered as `name`.
    ///
    /// Registered names take precedence over aliases.
    pub fn alias(mut self, alias: impl Into<String>, name: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), name.into());
        self
    }

    /// Finds the model registered as `name`, or the one `name` is an alias of.
    ///
    /// # Errors
    /// `HarnessErr::UnknownModel` if there's no such model.
    pub fn lookup(&self, name: &str) -> Result<&dyn Model> {
        let registered = if self.models.contains_key(name) {
            name
        } else {
            self.aliases.get(name).map_or(name, String::as_str)
        };

        self.models
            .get(registered)
            .map(|model| model.as_ref())
            .ok_or_else(|| HarnessErr::UnknownModel(name.to_string()))
    }

    /// The registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.models.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{Array1, Array2, ArrayView1};

    use super::*;
    use crate::model::{Dataset, ModelErr};

    struct Named(&'static str);

    impl Model for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn generate(
            &self,
            sample_size: usize,
            dim: usize,
            _sparsity_level: usize,
            _seed: u64,
        ) -> std::result::Result<(Array1<f64>, Dataset), ModelErr> {
            let data = Dataset::new(Array2::zeros((sample_size, dim)), Array1::zeros(sample_size));
            Ok((Array1::zeros(dim), data))
        }

        fn loss(&self, _params: ArrayView1<f64>, _data: &Dataset) -> f64 {
            0.
        }

        fn gradient(&self, params: ArrayView1<f64>, _data: &Dataset) -> Array1<f64> {
            Array1::zeros(params.len())
        }
    }

    #[test]
    fn lookup_registered() {
        let registry = ModelRegistry::new().with(Named("linear")).with(Named("logistic"));

        assert_eq!(registry.lookup("linear").unwrap().name(), "linear");
        assert_eq!(registry.names(), ["linear", "logistic"]);
    }

    #[test]
    fn lookup_unknown() {
        let registry = ModelRegistry::new().with(Named("linear"));

        let err = registry.lookup("ising").err().unwrap();
        assert!(matches!(err, HarnessErr::UnknownModel(name) if name == "ising"));
    }

    #[test]
    fn lookup_alias() {
        let registry = ModelRegistry::new()
            .with(Named("robust_ESL"))
            .alias("robust_esl", "robust_ESL")
            .alias("dangling", "missing");

        assert_eq!(registry.lookup("robust_esl").unwrap().name(), "robust_ESL");
        assert_eq!(registry.lookup("robust_ESL").unwrap().name(), "robust_ESL");
        assert_eq!(registry.names(), ["robust_ESL"]);

        let err = registry.lookup("dangling").err().unwrap();
        assert!(matches!(err, HarnessErr::UnknownModel(name) if name == "dangling"));
    }

    #[test]
    fn duplicate_name_replaces() {
        let registry = ModelRegistry::new().with(Named("linear")).with(Named("linear"));
        assert_eq!(registry.len(), 1);
    }
}
