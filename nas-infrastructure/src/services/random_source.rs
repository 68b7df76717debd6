use nas_domain::RandomSource;
use rand::Rng;

/// Prize rolls from the thread-local generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandomSource;

impl RandomSource for ThreadRandomSource {
    fn roll(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}
