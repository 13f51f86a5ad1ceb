//! Bounded waits over an [`Automation`] backend.
//!
//! Each wait polls the backend at a fixed interval until its condition holds
//! or the timeout elapses, in which case it fails with
//! [`ScraperError::Timeout`] naming the step and selector. There is no retry
//! beyond the polling itself.

use std::time::Duration;

use tokio::time::Instant;

use crate::automation::{Automation, ContextId};
use crate::error::ScraperError;

#[derive(Debug, Clone, Copy)]
pub struct Waiter {
    timeout: Duration,
    poll: Duration,
}

impl Waiter {
    #[must_use]
    pub fn new(timeout: Duration, poll: Duration) -> Self {
        Self { timeout, poll }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Waits until at least one element matches, then returns all matches.
    ///
    /// # Errors
    ///
    /// [`ScraperError::Timeout`] if nothing matches in time; driver errors
    /// are propagated immediately.
    pub async fn all<A: Automation>(
        &self,
        driver: &mut A,
        step: &'static str,
        selector: &str,
    ) -> Result<Vec<A::Element>, ScraperError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let found = driver.find_all(selector).await?;
            if !found.is_empty() {
                tracing::debug!(step, selector, count = found.len(), "elements located");
                return Ok(found);
            }
            self.tick(deadline, step, selector).await?;
        }
    }

    /// Waits for the first element matching `selector`.
    ///
    /// # Errors
    ///
    /// See [`Waiter::all`].
    pub async fn one<A: Automation>(
        &self,
        driver: &mut A,
        step: &'static str,
        selector: &str,
    ) -> Result<A::Element, ScraperError> {
        self.all(driver, step, selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| self.timed_out(step, selector))
    }

    /// Waits until the first match is interactable, then clicks it.
    ///
    /// # Errors
    ///
    /// See [`Waiter::all`].
    pub async fn click<A: Automation>(
        &self,
        driver: &mut A,
        step: &'static str,
        selector: &str,
    ) -> Result<(), ScraperError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            let found = driver.find_all(selector).await?;
            if let Some(element) = found.first() {
                if driver.is_interactable(element).await? {
                    driver.click(element).await?;
                    tracing::debug!(step, selector, "clicked");
                    return Ok(());
                }
            }
            self.tick(deadline, step, selector).await?;
        }
    }

    /// Waits until exactly `expected` browsing contexts are open and returns
    /// them.
    ///
    /// # Errors
    ///
    /// See [`Waiter::all`].
    pub async fn contexts<A: Automation>(
        &self,
        driver: &mut A,
        step: &'static str,
        expected: usize,
    ) -> Result<Vec<ContextId>, ScraperError> {
        let deadline = Instant::now() + self.timeout;
        let label = format!("{expected} browsing contexts");
        loop {
            let open = driver.contexts().await?;
            if open.len() == expected {
                return Ok(open);
            }
            self.tick(deadline, step, &label).await?;
        }
    }

    async fn tick(
        &self,
        deadline: Instant,
        step: &'static str,
        selector: &str,
    ) -> Result<(), ScraperError> {
        if Instant::now() >= deadline {
            return Err(self.timed_out(step, selector));
        }
        tokio::time::sleep(self.poll).await;
        Ok(())
    }

    fn timed_out(&self, step: &'static str, selector: &str) -> ScraperError {
        ScraperError::Timeout {
            step,
            selector: selector.to_string(),
            timeout_secs: self.timeout.as_secs(),
        }
    }
}

impl Default for Waiter {
    fn default() -> Self {
        Self::new(Duration::from_secs(10), Duration::from_millis(250))
    }
}
