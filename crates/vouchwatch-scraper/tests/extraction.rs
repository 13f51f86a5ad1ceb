//! Integration tests for `ExtractionSession::extract`.
//!
//! Runs the session against `FakeVendor`, a scripted in-memory rendition of
//! the vendor page. Each reveal opens a fresh tab that shows the offer list
//! again (unfiltered) with the code overlay on top, and element handles from
//! any tab other than the current one are rejected the way a real browser
//! rejects detached nodes.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use vouchwatch_core::VoucherError;
use vouchwatch_scraper::{
    Automation, ContextId, DriverError, Extraction, ExtractionSession, PageProfile, Pacing,
    ScraperError, Waiter,
};

struct Offer {
    discount: &'static str,
    description: &'static str,
    expiration: &'static str,
    code: &'static str,
}

struct Tab {
    id: ContextId,
    filtered: bool,
    cookies_rejected: bool,
    revealed: Option<usize>,
    overlay_open: bool,
}

#[derive(Debug, Clone)]
struct Handle {
    context: ContextId,
    selector: String,
    index: usize,
}

struct FakeVendor {
    profile: PageProfile,
    heading: String,
    offers: Vec<Offer>,
    missing_descriptions: usize,
    opens_tabs: bool,
    navigated: bool,
    tabs: Vec<Tab>,
    current: ContextId,
    next_tab: usize,
    closed: Vec<ContextId>,
    reveal_clicks: Vec<usize>,
    stale_uses: usize,
}

impl FakeVendor {
    fn new(offers: Vec<Offer>) -> Self {
        let main = ContextId::new("tab-0");
        Self {
            profile: PageProfile::default(),
            heading: "Codes promo La Redoute valides en mars 2024".to_string(),
            offers,
            missing_descriptions: 0,
            opens_tabs: true,
            navigated: false,
            tabs: vec![Tab {
                id: main.clone(),
                filtered: false,
                cookies_rejected: false,
                revealed: None,
                overlay_open: false,
            }],
            current: main,
            next_tab: 1,
            closed: Vec::new(),
            reveal_clicks: Vec::new(),
            stale_uses: 0,
        }
    }

    fn tab(&self) -> Result<&Tab, DriverError> {
        self.tabs
            .iter()
            .find(|t| t.id == self.current)
            .ok_or_else(|| DriverError::UnknownContext(self.current.to_string()))
    }

    fn tab_mut(&mut self) -> Result<&mut Tab, DriverError> {
        let current = self.current.clone();
        self.tabs
            .iter_mut()
            .find(|t| t.id == current)
            .ok_or_else(|| DriverError::UnknownContext(current.to_string()))
    }

    fn check(&mut self, handle: &Handle) -> Result<(), DriverError> {
        if handle.context != self.current || self.closed.contains(&handle.context) {
            self.stale_uses += 1;
            return Err(DriverError::Backend(format!(
                "stale element reference: {} in {}",
                handle.selector, handle.context
            )));
        }
        Ok(())
    }

    fn count(&self, selector: &str) -> Result<usize, DriverError> {
        let tab = self.tab()?;
        let p = &self.profile;
        let listed = if tab.filtered { self.offers.len() } else { 0 };
        let n = if !self.navigated {
            0
        } else if selector == p.reject_cookies {
            usize::from(!tab.cookies_rejected)
        } else if selector == p.vendor_heading || selector == p.codes_only_filter {
            1
        } else if selector == p.description {
            listed.saturating_sub(self.missing_descriptions)
        } else if selector == p.discount
            || selector == p.expiration_date
            || selector == p.reveal_trigger
        {
            listed
        } else if selector == p.revealed_code {
            usize::from(tab.overlay_open && tab.revealed.is_some())
        } else if selector == p.close_overlay {
            usize::from(tab.overlay_open)
        } else {
            0
        };
        Ok(n)
    }
}

#[async_trait]
impl Automation for FakeVendor {
    type Element = Handle;

    async fn navigate(&mut self, _url: &str) -> Result<(), DriverError> {
        self.navigated = true;
        Ok(())
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<Handle>, DriverError> {
        let n = self.count(selector)?;
        Ok((0..n)
            .map(|index| Handle {
                context: self.current.clone(),
                selector: selector.to_string(),
                index,
            })
            .collect())
    }

    async fn is_interactable(&mut self, element: &Handle) -> Result<bool, DriverError> {
        self.check(element)?;
        Ok(true)
    }

    async fn click(&mut self, element: &Handle) -> Result<(), DriverError> {
        self.check(element)?;
        let p = self.profile.clone();
        let selector = element.selector.as_str();
        if selector == p.reject_cookies {
            self.tab_mut()?.cookies_rejected = true;
        } else if selector == p.codes_only_filter {
            self.tab_mut()?.filtered = true;
        } else if selector == p.close_overlay {
            self.tab_mut()?.overlay_open = false;
        } else if selector == p.reveal_trigger {
            self.reveal_clicks.push(element.index);
            if self.opens_tabs {
                let id = ContextId::new(format!("tab-{}", self.next_tab));
                self.next_tab += 1;
                self.tabs.push(Tab {
                    id,
                    filtered: false,
                    cookies_rejected: true,
                    revealed: Some(element.index),
                    overlay_open: true,
                });
            }
        }
        Ok(())
    }

    async fn scroll_into_view(&mut self, element: &Handle) -> Result<(), DriverError> {
        self.check(element)
    }

    async fn text(&mut self, element: &Handle) -> Result<String, DriverError> {
        self.check(element)?;
        let p = &self.profile;
        let selector = element.selector.as_str();
        let offer = self.offers.get(element.index);
        let text = if selector == p.vendor_heading {
            self.heading.clone()
        } else if selector == p.discount {
            offer.map(|o| format!(" {} ", o.discount)).unwrap_or_default()
        } else if selector == p.description {
            offer.map(|o| o.description.to_string()).unwrap_or_default()
        } else if selector == p.expiration_date {
            offer.map(|o| o.expiration.to_string()).unwrap_or_default()
        } else if selector == p.revealed_code {
            self.tab()?
                .revealed
                .and_then(|i| self.offers.get(i))
                .map(|o| o.code.to_string())
                .unwrap_or_default()
        } else {
            String::new()
        };
        Ok(text)
    }

    async fn contexts(&mut self) -> Result<Vec<ContextId>, DriverError> {
        Ok(self.tabs.iter().map(|t| t.id.clone()).collect())
    }

    async fn switch_to(&mut self, context: &ContextId) -> Result<(), DriverError> {
        if !self.tabs.iter().any(|t| &t.id == context) {
            return Err(DriverError::UnknownContext(context.to_string()));
        }
        self.current = context.clone();
        Ok(())
    }

    async fn close_context(&mut self, context: &ContextId) -> Result<(), DriverError> {
        let before = self.tabs.len();
        self.tabs.retain(|t| &t.id != context);
        if self.tabs.len() == before {
            return Err(DriverError::UnknownContext(context.to_string()));
        }
        self.closed.push(context.clone());
        Ok(())
    }

    async fn shutdown(self) -> Result<(), DriverError> {
        Ok(())
    }
}

fn three_offers() -> Vec<Offer> {
    vec![
        Offer {
            discount: "10%",
            description: "Sur tout le site",
            expiration: "Expire demain",
            code: "TEN",
        },
        Offer {
            discount: "25%",
            description: "Mode femme",
            expiration: "Expire le\n: 15 mars",
            code: "QUARTER",
        },
        Offer {
            discount: "5%",
            description: "Livraison offerte",
            expiration: "Expire aujourd'hui",
            code: "FIVE",
        },
    ]
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn waiter() -> Waiter {
    Waiter::new(Duration::from_secs(2), Duration::from_millis(100))
}

async fn run(vendor: &mut FakeVendor, pacing: Pacing) -> Result<Extraction, ScraperError> {
    let profile = vendor.profile.clone();
    ExtractionSession::new(vendor, profile, waiter(), pacing)
        .with_today(date(2024, 3, 10))
        .extract("https://vendor.test/codes")
        .await
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn extract_collects_every_offer_sorted_by_discount() {
    let mut vendor = FakeVendor::new(three_offers());

    let extraction = run(&mut vendor, Pacing::from_millis(0)).await.unwrap();

    assert_eq!(extraction.vendor, "La Redoute");
    let rows = extraction.table.rows();
    let summary: Vec<_> = rows
        .iter()
        .map(|r| (r.discount.as_str(), r.code.as_str(), r.expiration_date))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("25%", "QUARTER", date(2024, 3, 15)),
            ("10%", "TEN", date(2024, 3, 11)),
            ("5%", "FIVE", date(2024, 3, 10)),
        ]
    );
    assert_eq!(rows[0].description, "Mode femme");
}

#[tokio::test(start_paused = true)]
async fn each_reveal_leaves_exactly_one_tab_open() {
    let mut vendor = FakeVendor::new(three_offers());

    run(&mut vendor, Pacing::from_millis(0)).await.unwrap();

    assert_eq!(vendor.tabs.len(), 1);
    assert_eq!(vendor.current.as_str(), "tab-3");
    assert_eq!(
        vendor.closed,
        vec![
            ContextId::new("tab-0"),
            ContextId::new("tab-1"),
            ContextId::new("tab-2"),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn triggers_are_recollected_in_each_new_tab() {
    let mut vendor = FakeVendor::new(three_offers());

    run(&mut vendor, Pacing::from_millis(0)).await.unwrap();

    assert_eq!(vendor.reveal_clicks, vec![0, 1, 2]);
    assert_eq!(vendor.stale_uses, 0, "a handle from a closed tab was used");
}

#[tokio::test(start_paused = true)]
async fn pacing_is_applied_between_reveals() {
    let mut vendor = FakeVendor::new(three_offers());
    let start = tokio::time::Instant::now();

    run(&mut vendor, Pacing::from_millis(1000)).await.unwrap();

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(3), "elapsed: {elapsed:?}");
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn timeout_names_step_and_selector() {
    let mut vendor = FakeVendor::new(three_offers());
    vendor.profile.vendor_heading = "h1.renamed".to_string();
    let profile = PageProfile::default();

    let err = ExtractionSession::new(
        &mut vendor,
        profile.clone(),
        waiter(),
        Pacing::from_millis(0),
    )
    .extract("https://vendor.test/codes")
    .await
    .unwrap_err();

    match err {
        ScraperError::Timeout {
            step,
            selector,
            timeout_secs,
        } => {
            assert_eq!(step, "vendor heading");
            assert_eq!(selector, profile.vendor_heading);
            assert_eq!(timeout_secs, 2);
        }
        other => panic!("expected Timeout, got: {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn reveal_tab_that_never_opens_times_out() {
    let mut vendor = FakeVendor::new(three_offers());
    vendor.opens_tabs = false;

    let err = run(&mut vendor, Pacing::from_millis(0)).await.unwrap_err();

    assert!(
        matches!(err, ScraperError::Timeout { step: "reveal tab", ref selector, .. } if selector == "2 browsing contexts"),
        "got: {err:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn heading_without_vendor_markers_is_structure_error() {
    let mut vendor = FakeVendor::new(three_offers());
    vendor.heading = "Bons plans du moment".to_string();

    let err = run(&mut vendor, Pacing::from_millis(0)).await.unwrap_err();

    assert!(
        matches!(err, ScraperError::Structure { field: "vendor_name", .. }),
        "got: {err:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn misaligned_columns_fail_the_extraction() {
    let mut vendor = FakeVendor::new(three_offers());
    vendor.missing_descriptions = 1;

    let err = run(&mut vendor, Pacing::from_millis(0)).await.unwrap_err();

    assert!(
        matches!(
            err,
            ScraperError::Voucher(VoucherError::ColumnMismatch {
                field: "description",
                expected: 3,
                found: 2,
            })
        ),
        "got: {err:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn empty_revealed_code_is_structure_error() {
    let mut offers = three_offers();
    offers[1].code = "  ";
    let mut vendor = FakeVendor::new(offers);

    let err = run(&mut vendor, Pacing::from_millis(0)).await.unwrap_err();

    assert!(
        matches!(err, ScraperError::Structure { field: "code", .. }),
        "got: {err:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn malformed_discount_fails_the_extraction() {
    let mut offers = three_offers();
    offers[2].discount = "Livraison";
    let mut vendor = FakeVendor::new(offers);

    let err = run(&mut vendor, Pacing::from_millis(0)).await.unwrap_err();

    assert!(
        matches!(
            err,
            ScraperError::Voucher(VoucherError::MalformedDiscount { .. })
        ),
        "got: {err:?}"
    );
}
