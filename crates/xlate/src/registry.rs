//! Registry for generators.

use crate::traits::{Generator, Target};
use std::sync::{OnceLock, PoisonError, RwLock};

/// Global generator registry.
static GENERATORS: RwLock<Vec<&'static dyn Generator>> = RwLock::new(Vec::new());
static GENERATORS_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom generator. Lookups return the first registered
/// generator for a target, so built-ins win over later registrations.
pub fn register_generator(generator: &'static dyn Generator) {
    GENERATORS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(generator);
}

fn init_generators() {
    GENERATORS_INITIALIZED.get_or_init(|| {
        #[cfg(feature = "write-c")]
        {
            register_generator(&crate::output::c::C_GENERATOR);
        }
        #[cfg(feature = "write-python")]
        {
            register_generator(&crate::output::python::PYTHON_GENERATOR);
        }
    });
}

/// Get the generator for a target.
pub fn generator_for(target: Target) -> Option<&'static dyn Generator> {
    init_generators();
    GENERATORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .find(|g| g.target() == target)
        .copied()
}

/// Get a generator by target name (`c`, `python`, `py`).
pub fn generator_for_name(name: &str) -> Option<&'static dyn Generator> {
    generator_for(name.parse().ok()?)
}

/// Get all registered generators.
pub fn generators() -> Vec<&'static dyn Generator> {
    init_generators();
    GENERATORS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "write-c")]
    fn test_c_lookup() {
        let generator = generator_for(Target::C).expect("c generator");
        assert_eq!(generator.target(), Target::C);
        assert_eq!(generator.target().extension(), "c");
    }

    #[test]
    #[cfg(feature = "write-python")]
    fn test_python_lookup_by_name() {
        let generator = generator_for_name("py").expect("python generator");
        assert_eq!(generator.target(), Target::Python);
        assert!(generator_for_name("cobol").is_none());
    }

    #[test]
    #[cfg(all(feature = "write-c", feature = "write-python"))]
    fn test_all_builtins_registered() {
        let targets: Vec<Target> = generators().iter().map(|g| g.target()).collect();
        assert!(targets.contains(&Target::C));
        assert!(targets.contains(&Target::Python));
    }
}
