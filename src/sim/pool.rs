//! Object recycling for high-churn entity types
//!
//! Asteroids, projectiles, UFOs and blasts are spawned and destroyed constantly,
//! so instances go back to a free list instead of being dropped.

use std::fmt;

use crate::error::{Result, SimError};

/// An instance a [`Pool`] can hand out and take back.
pub trait Poolable {
    /// Identifies the pool an instance returns to
    type Home: Copy + PartialEq + fmt::Debug;

    /// Clear all gameplay-transient state before the instance is reused
    fn reset(&mut self);

    /// Pool the instance currently belongs to (`None` once returned or if never pooled)
    fn home(&self) -> Option<Self::Home>;

    /// Attach or detach the return route
    fn set_home(&mut self, home: Option<Self::Home>);
}

/// Free list plus a factory for building instances on demand
pub struct Pool<T: Poolable> {
    home: T::Home,
    free: Vec<T>,
    factory: Box<dyn Fn() -> T>,
    maximum: Option<usize>,
    /// Instances handed out and not yet returned
    outstanding: usize,
    created: usize,
}

impl<T: Poolable> Pool<T> {
    pub fn new(home: T::Home, factory: impl Fn() -> T + 'static) -> Self {
        Self {
            home,
            free: Vec::new(),
            factory: Box::new(factory),
            maximum: None,
            outstanding: 0,
            created: 0,
        }
    }

    /// Cap the number of instances that may be out at once
    pub fn with_maximum(mut self, maximum: Option<usize>) -> Self {
        self.maximum = maximum;
        self
    }

    /// Hand out a recycled instance, or build a fresh one
    pub fn obtain(&mut self) -> Result<T> {
        if let Some(maximum) = self.maximum {
            if self.outstanding >= maximum {
                return Err(SimError::PoolExhausted {
                    pool: format!("{:?}", self.home),
                    maximum,
                });
            }
        }

        let mut item = match self.free.pop() {
            Some(item) => item,
            None => {
                self.created += 1;
                (self.factory)()
            }
        };
        item.set_home(Some(self.home));
        self.outstanding += 1;
        Ok(item)
    }

    /// Take an instance back: detach its return route, reset it, and shelve it.
    ///
    /// Instances that belong to a different pool are dropped.
    pub fn give_back(&mut self, mut item: T) {
        if item.home() != Some(self.home) {
            log::debug!(
                "Pool {:?} refusing instance from {:?}",
                self.home,
                item.home()
            );
            return;
        }
        item.set_home(None);
        item.reset();
        self.outstanding = self.outstanding.saturating_sub(1);
        self.free.push(item);
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Total instances the factory has built
    pub fn created(&self) -> usize {
        self.created
    }
}

impl<T: Poolable> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("home", &self.home)
            .field("free", &self.free.len())
            .field("outstanding", &self.outstanding)
            .field("maximum", &self.maximum)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Token {
        serial: u32,
        target: Option<u32>,
        home: Option<&'static str>,
    }

    impl Poolable for Token {
        type Home = &'static str;

        fn reset(&mut self) {
            self.target = None;
        }

        fn home(&self) -> Option<&'static str> {
            self.home
        }

        fn set_home(&mut self, home: Option<&'static str>) {
            self.home = home;
        }
    }

    fn token_pool() -> Pool<Token> {
        use std::cell::Cell;
        let next = Cell::new(0);
        Pool::new("token", move || {
            next.set(next.get() + 1);
            Token {
                serial: next.get(),
                ..Default::default()
            }
        })
    }

    #[test]
    fn test_obtain_builds_then_recycles() {
        let mut pool = token_pool();
        let mut first = pool.obtain().unwrap();
        assert_eq!(first.home, Some("token"));
        first.target = Some(9);
        let serial = first.serial;

        pool.give_back(first);
        assert_eq!(pool.outstanding(), 0);

        let again = pool.obtain().unwrap();
        assert_eq!(again.serial, serial);
        assert_eq!(again.target, None, "reset must clear the old target");
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn test_maximum_counts_outstanding() {
        let mut pool = token_pool().with_maximum(Some(2));
        let a = pool.obtain().unwrap();
        let _b = pool.obtain().unwrap();
        let err = pool.obtain().unwrap_err();
        assert!(matches!(err, SimError::PoolExhausted { maximum: 2, .. }));

        pool.give_back(a);
        assert!(pool.obtain().is_ok());
    }

    #[test]
    fn test_foreign_instance_dropped() {
        let mut pool = token_pool();
        pool.give_back(Token {
            home: Some("other"),
            ..Default::default()
        });
        // Nothing was shelved, so the next obtain builds
        pool.obtain().unwrap();
        assert_eq!(pool.created(), 1);
    }
}
