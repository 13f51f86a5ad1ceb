//! Chromium backend over the DevTools protocol.

use std::path::PathBuf;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::automation::{Automation, ContextId};
use crate::error::DriverError;

/// Returns true when the element has a non-empty box, is not hidden, and is
/// not disabled.
const INTERACTABLE_JS: &str = "function() {
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden'
        && style.display !== 'none'
        && !this.disabled;
}";

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub headless: bool,
    /// Browser binary. Auto-detected when `None`.
    pub executable: Option<PathBuf>,
}

pub struct ChromiumDriver {
    browser: Browser,
    handler: JoinHandle<()>,
    current: Page,
}

impl ChromiumDriver {
    /// Launches a browser and opens one blank tab as the current context.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Launch`] if the configuration is rejected or
    /// the browser process cannot be started.
    pub async fn launch(options: &LaunchOptions) -> Result<Self, DriverError> {
        let mut builder = BrowserConfig::builder();
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::warn!(error = %e, "browser event loop stopped");
                    break;
                }
            }
        });

        let current = browser.new_page("about:blank").await?;
        tracing::info!(
            headless = options.headless,
            executable = ?options.executable,
            "browser launched"
        );

        Ok(Self {
            browser,
            handler,
            current,
        })
    }

    async fn page(&self, context: &ContextId) -> Result<Page, DriverError> {
        self.browser
            .pages()
            .await?
            .into_iter()
            .find(|page| page.target_id().inner() == context.as_str())
            .ok_or_else(|| DriverError::UnknownContext(context.to_string()))
    }
}

#[async_trait]
impl Automation for ChromiumDriver {
    type Element = Element;

    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.current.goto(url).await?;
        Ok(())
    }

    async fn find_all(&mut self, selector: &str) -> Result<Vec<Element>, DriverError> {
        // A missing node surfaces as a protocol error; treat it as no match.
        match self.current.find_elements(selector).await {
            Ok(found) => Ok(found),
            Err(e) => {
                tracing::trace!(selector, error = %e, "no match");
                Ok(Vec::new())
            }
        }
    }

    async fn is_interactable(&mut self, element: &Element) -> Result<bool, DriverError> {
        let result = element.call_js_fn(INTERACTABLE_JS, false).await?;
        Ok(result
            .result
            .value
            .and_then(|value| value.as_bool())
            .unwrap_or(false))
    }

    async fn click(&mut self, element: &Element) -> Result<(), DriverError> {
        element.click().await?;
        Ok(())
    }

    async fn scroll_into_view(&mut self, element: &Element) -> Result<(), DriverError> {
        element.scroll_into_view().await?;
        Ok(())
    }

    async fn text(&mut self, element: &Element) -> Result<String, DriverError> {
        Ok(element.inner_text().await?.unwrap_or_default())
    }

    async fn contexts(&mut self) -> Result<Vec<ContextId>, DriverError> {
        Ok(self
            .browser
            .pages()
            .await?
            .iter()
            .map(|page| ContextId::new(page.target_id().inner().clone()))
            .collect())
    }

    async fn switch_to(&mut self, context: &ContextId) -> Result<(), DriverError> {
        let page = self.page(context).await?;
        page.bring_to_front().await?;
        self.current = page;
        Ok(())
    }

    async fn close_context(&mut self, context: &ContextId) -> Result<(), DriverError> {
        let page = self.page(context).await?;
        page.close().await?;
        Ok(())
    }

    async fn shutdown(mut self) -> Result<(), DriverError> {
        let closed = self.browser.close().await;
        let waited = self.browser.wait().await;
        self.handler.abort();
        closed?;
        waited.map_err(|e| DriverError::Backend(format!("browser did not exit cleanly: {e}")))?;
        tracing::info!("browser closed");
        Ok(())
    }
}
