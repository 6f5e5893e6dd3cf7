use std::{
    sync::Arc,
    thread::sleep,
    time::{Duration, Instant},
};

use anyhow::Context;
use headless_chrome::{Browser, LaunchOptions, Tab};
use log::{debug, info};

use crate::{
    config::BrowserConfig,
    interrupt::Interrupt,
    soundcloud::{RenderPage, ResolveError},
};

/// A single Chrome tab reused for every page.
pub struct ChromeRenderer {
    // Must outlive `tab`.
    _browser: Browser,
    tab: Arc<Tab>,
    timeout: Duration,
    poll_interval: Duration,
    interrupt: Interrupt,
}

impl ChromeRenderer {
    pub fn launch(config: &BrowserConfig, interrupt: Interrupt) -> anyhow::Result<Self> {
        info!("Starting browser");
        let options = LaunchOptions::default_builder()
            .headless(config.headless)
            .path(config.chrome_path.clone())
            .port(config.remote_debugging_port)
            .idle_browser_timeout(Duration::from_secs(300))
            .build()?;
        let browser = Browser::new(options).context("Failed to start browser")?;
        let tab = browser.new_tab()?;
        Ok(Self {
            _browser: browser,
            tab,
            timeout: config.render_timeout(),
            poll_interval: config.poll_interval(),
            interrupt,
        })
    }

    fn check_interrupt(&self) -> Result<(), ResolveError> {
        self.interrupt
            .check()
            .map_err(|_| ResolveError::Interrupted)
    }

    /// Ctrl-C also reaches Chrome, so a failure right after it is an interrupt.
    fn render_error(&self, e: anyhow::Error) -> ResolveError {
        match self.check_interrupt() {
            Ok(()) => ResolveError::Render(e),
            Err(interrupted) => interrupted,
        }
    }
}

impl RenderPage for ChromeRenderer {
    fn render(&self, url: &str, ready_selector: &str) -> Result<String, ResolveError> {
        self.check_interrupt()?;
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| self.render_error(e))?;
        let deadline = Instant::now() + self.timeout;
        loop {
            self.check_interrupt()?;
            if self.tab.find_element(ready_selector).is_ok() {
                break;
            }
            if Instant::now() >= deadline {
                debug!("{ready_selector:?} did not appear within {:?}", self.timeout);
                break;
            }
            sleep(self.poll_interval);
        }
        self.tab.get_content().map_err(|e| self.render_error(e))
    }
}
