//! One extraction pass over the vendor page.
//!
//! The session drives an [`Automation`] backend through a fixed sequence:
//! open the page, reject cookies, read the vendor name, filter to code
//! offers, collect the per-offer fields, then reveal every code one at a
//! time. Each reveal opens a new tab, closes the previous ones and moves
//! into the new tab, which invalidates every element handle held so far.
//!
//! Handles are therefore stamped with the *context epoch* they were found
//! in. The epoch advances whenever browsing contexts are closed or
//! switched, and a stamped handle from an older epoch is refused. The
//! reveal loop re-applies the filter and re-collects triggers whenever its
//! cached triggers are from an older epoch.

use chrono::{Local, NaiveDate};
use vouchwatch_core::VoucherTable;

use crate::automation::Automation;
use crate::dates::normalize_expiration;
use crate::error::ScraperError;
use crate::pacing::Pacing;
use crate::selectors::{vendor_name, PageProfile};
use crate::wait::Waiter;

/// Result of a completed extraction pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub vendor: String,
    pub table: VoucherTable,
}

/// A value obtained in a particular context epoch.
#[derive(Debug)]
struct Scoped<T> {
    epoch: u64,
    value: T,
}

pub struct ExtractionSession<'d, A: Automation> {
    driver: &'d mut A,
    profile: PageProfile,
    waiter: Waiter,
    pacing: Pacing,
    today: NaiveDate,
    epoch: u64,
}

impl<'d, A: Automation> ExtractionSession<'d, A> {
    pub fn new(driver: &'d mut A, profile: PageProfile, waiter: Waiter, pacing: Pacing) -> Self {
        Self {
            driver,
            profile,
            waiter,
            pacing,
            today: Local::now().date_naive(),
            epoch: 0,
        }
    }

    /// Overrides the reference date used to resolve expiration labels.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Runs the full protocol against `url`.
    ///
    /// Either every field and every code is collected or an error is
    /// returned; there is no partial result. The backend is left open for
    /// the caller to shut down.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Timeout`] when a required element never appears.
    /// - [`ScraperError::Structure`] / [`ScraperError::Voucher`] when page
    ///   text does not have the expected shape.
    /// - [`ScraperError::Driver`] for backend failures.
    pub async fn extract(mut self, url: &str) -> Result<Extraction, ScraperError> {
        tracing::info!(url, "opening vendor page");
        self.driver.navigate(url).await?;

        self.waiter
            .click(self.driver, "reject cookies", &self.profile.reject_cookies)
            .await?;

        let vendor = self.read_vendor_name().await?;

        self.apply_codes_filter().await?;

        let discounts =
            Self::field_texts(self.driver, self.waiter, "discount", &self.profile.discount).await?;
        let descriptions =
            Self::field_texts(self.driver, self.waiter, "description", &self.profile.description)
                .await?;
        let expiration_dates = Self::field_texts(
            self.driver,
            self.waiter,
            "expiration_date",
            &self.profile.expiration_date,
        )
        .await?
        .iter()
        .map(|raw| normalize_expiration(raw, self.today))
        .collect::<Result<Vec<_>, _>>()?;

        let codes = self.reveal_all(&vendor).await?;

        let table = VoucherTable::from_columns(discounts, descriptions, expiration_dates, codes)?;
        tracing::info!(vendor = %vendor, count = table.len(), "extraction complete");

        Ok(Extraction { vendor, table })
    }

    async fn read_vendor_name(&mut self) -> Result<String, ScraperError> {
        let heading = self
            .waiter
            .one(self.driver, "vendor heading", &self.profile.vendor_heading)
            .await?;
        let text = self.driver.text(&heading).await?;
        vendor_name(&text, &self.profile.vendor_prefix, &self.profile.vendor_suffix)
            .map(str::to_string)
            .ok_or_else(|| {
                ScraperError::structure(
                    "vendor_name",
                    text.clone(),
                    format!(
                        "expected the name between {:?} and {:?}",
                        self.profile.vendor_prefix, self.profile.vendor_suffix
                    ),
                )
            })
    }

    async fn apply_codes_filter(&mut self) -> Result<(), ScraperError> {
        self.waiter
            .click(self.driver, "codes-only filter", &self.profile.codes_only_filter)
            .await
    }

    /// Text of every element matching a per-offer field selector, in page
    /// order.
    async fn field_texts(
        driver: &mut A,
        waiter: Waiter,
        field: &'static str,
        selector: &str,
    ) -> Result<Vec<String>, ScraperError> {
        let elements = waiter.all(driver, field, selector).await?;

        let mut texts = Vec::with_capacity(elements.len());
        for element in &elements {
            texts.push(driver.text(element).await?.trim().to_string());
        }
        tracing::debug!(field, count = texts.len(), "field collected");
        Ok(texts)
    }

    async fn reveal_triggers(&mut self) -> Result<Scoped<Vec<A::Element>>, ScraperError> {
        let triggers = self
            .waiter
            .all(self.driver, "reveal triggers", &self.profile.reveal_trigger)
            .await?;
        Ok(self.scoped(triggers))
    }

    async fn reveal_all(&mut self, vendor: &str) -> Result<Vec<String>, ScraperError> {
        let mut triggers = self.reveal_triggers().await?;
        let total = triggers.value.len();
        tracing::info!(vendor, total, "{total} code(s) found for {vendor}");

        let mut codes = Vec::with_capacity(total);
        for i in 0..total {
            if i > 0 {
                self.pacing.pause().await;
            }

            if triggers.epoch != self.epoch {
                tracing::debug!(
                    held = triggers.epoch,
                    current = self.epoch,
                    "trigger handles are stale; re-collecting"
                );
                self.apply_codes_filter().await?;
                triggers = self.reveal_triggers().await?;
            }

            let available = self.live(&triggers, "reveal trigger")?;
            let trigger = available.get(i).ok_or_else(|| {
                ScraperError::structure(
                    "reveal_trigger",
                    format!("{} trigger(s)", available.len()),
                    format!("expected at least {} of {total}", i + 1),
                )
            })?;

            tracing::info!("Scraping code {}/{}...", i + 1, total);
            codes.push(self.reveal(trigger).await?);
        }

        Ok(codes)
    }

    /// Opens the reveal tab for one offer, keeps only that tab, reads the
    /// code and dismisses the overlay.
    async fn reveal(&mut self, trigger: &A::Element) -> Result<String, ScraperError> {
        let before = self.driver.contexts().await?;

        self.driver.scroll_into_view(trigger).await?;
        self.driver.click(trigger).await?;

        let after = self
            .waiter
            .contexts(self.driver, "reveal tab", before.len() + 1)
            .await?;
        let opened = after
            .into_iter()
            .find(|ctx| !before.contains(ctx))
            .ok_or_else(|| {
                ScraperError::structure(
                    "reveal_tab",
                    format!("{} context(s)", before.len() + 1),
                    "no new browsing context among the open ones",
                )
            })?;

        for ctx in &before {
            self.driver.close_context(ctx).await?;
        }
        self.epoch += 1;
        self.driver.switch_to(&opened).await?;
        tracing::debug!(context = %opened, epoch = self.epoch, "switched to reveal tab");

        let code_element = self
            .waiter
            .one(self.driver, "revealed code", &self.profile.revealed_code)
            .await?;
        let code = self.driver.text(&code_element).await?.trim().to_string();
        if code.is_empty() {
            return Err(ScraperError::structure(
                "code",
                code,
                "revealed code element is empty",
            ));
        }

        self.waiter
            .click(self.driver, "close overlay", &self.profile.close_overlay)
            .await?;

        Ok(code)
    }

    fn scoped<T>(&self, value: T) -> Scoped<T> {
        Scoped {
            epoch: self.epoch,
            value,
        }
    }

    fn live<'h, T>(&self, handle: &'h Scoped<T>, step: &'static str) -> Result<&'h T, ScraperError> {
        if handle.epoch == self.epoch {
            Ok(&handle.value)
        } else {
            Err(ScraperError::StaleHandle { step })
        }
    }
}
