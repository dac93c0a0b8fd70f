use crate::clock::Clock;
use crate::images::cache::{ImageCache, ImageStore};
use crate::images::providers::ImageProvider;
use crate::model::ImageSource;

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub url: String,
    pub source: ImageSource,
    pub from_cache: bool,
}

/// Cache first, then each provider in order; the first URL wins and is cached.
pub struct ImageResolver<'p, S, C> {
    cache: ImageCache<S, C>,
    providers: Vec<&'p dyn ImageProvider>,
}

impl<'p, S: ImageStore, C: Clock> ImageResolver<'p, S, C> {
    pub fn new(cache: ImageCache<S, C>) -> Self {
        Self {
            cache,
            providers: Vec::new(),
        }
    }

    pub fn with_provider(mut self, provider: &'p dyn ImageProvider) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn cache(&self) -> &ImageCache<S, C> {
        &self.cache
    }

    /// `None` means every step came up empty: render a placeholder.
    pub fn resolve(&self, name: &str, country: Option<&str>) -> Option<ResolvedImage> {
        if let Some(hit) = self.cache.get(name, country) {
            tracing::debug!(name, source = %hit.source, "image cache hit");
            return Some(ResolvedImage {
                url: hit.url,
                source: hit.source,
                from_cache: true,
            });
        }

        for provider in &self.providers {
            match provider.find(name, country) {
                Ok(Some(found)) => {
                    tracing::debug!(name, provider = provider.name(), "image found");
                    self.cache.put(name, country, &found.url, found.source);
                    return Some(ResolvedImage {
                        url: found.url,
                        source: found.source,
                        from_cache: false,
                    });
                }
                Ok(None) => {
                    tracing::debug!(name, provider = provider.name(), "no image");
                }
                Err(e) => {
                    tracing::warn!(name, provider = provider.name(), error = %e, "image lookup failed");
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::images::cache::MemoryStore;
    use crate::images::providers::FoundImage;
    use anyhow::{Result, bail};
    use std::cell::Cell;

    struct Fake {
        answer: Option<&'static str>,
        fail: bool,
        calls: Cell<u32>,
    }

    impl Fake {
        fn new(answer: Option<&'static str>) -> Self {
            Self {
                answer,
                fail: false,
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answer: None,
                fail: true,
                calls: Cell::new(0),
            }
        }
    }

    impl ImageProvider for Fake {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn find(&self, _name: &str, _country: Option<&str>) -> Result<Option<FoundImage>> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                bail!("connection reset");
            }
            Ok(self.answer.map(|u| FoundImage {
                url: u.to_string(),
                source: ImageSource::GooglePlaces,
            }))
        }
    }

    #[test]
    fn network_failure_advances_to_next_step() {
        let clock = FixedClock::new(0);
        let (wiki, backend) = (Fake::failing(), Fake::new(Some("https://img/b.jpg")));
        let r = ImageResolver::new(ImageCache::new(MemoryStore::new(), &clock))
            .with_provider(&wiki)
            .with_provider(&backend);

        let img = r.resolve("Girona", Some("Spain")).unwrap();
        assert_eq!(img.url, "https://img/b.jpg");
        assert!(!img.from_cache);
        assert_eq!((wiki.calls.get(), backend.calls.get()), (1, 1));

        let again = r.resolve("Girona", Some("Spain")).unwrap();
        assert!(again.from_cache);
        assert_eq!(again.source, ImageSource::GooglePlaces);
        assert_eq!((wiki.calls.get(), backend.calls.get()), (1, 1));
    }

    #[test]
    fn all_steps_empty_yields_none() {
        let clock = FixedClock::new(0);
        let (wiki, backend) = (Fake::new(None), Fake::failing());
        let r = ImageResolver::new(ImageCache::new(MemoryStore::new(), &clock))
            .with_provider(&wiki)
            .with_provider(&backend);

        assert_eq!(r.resolve("Nowhere", None), None);
        assert!(r.cache().store().is_empty());
    }
}
