// src/display/page.rs
use std::collections::{HashMap, HashSet};
use std::path::Path;
use chrono::Local;
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::{ThreatScopeError, ThreatScopeResult};
use crate::render::template::PAGE_TEMPLATE;
use crate::render::{ResultRenderer, TemplateEngine, TIMESTAMP_FORMAT};
use super::{DisplayPort, Region};

/// In-memory page whose regions can be written out as one HTML document
pub struct PageDisplay {
    title: String,
    regions: Mutex<HashMap<Region, String>>,
    pinned: Mutex<HashSet<Region>>,
    renderer: ResultRenderer,
    template_engine: TemplateEngine,
}

impl PageDisplay {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            regions: Mutex::new(HashMap::new()),
            pinned: Mutex::new(HashSet::new()),
            renderer: ResultRenderer::new(),
            template_engine: TemplateEngine::with_defaults(),
        }
    }

    /// Current markup of a region, empty if never written
    pub fn region(&self, region: Region) -> String {
        self.regions.lock().get(&region).cloned().unwrap_or_default()
    }

    /// Whether the region is scrolled to its latest entry. Replacing the
    /// region's markup clears the mark.
    pub fn is_pinned(&self, region: Region) -> bool {
        self.pinned.lock().contains(&region)
    }

    /// Render the full page
    pub fn render_page(&self) -> ThreatScopeResult<String> {
        let mut variables = HashMap::new();
        variables.insert("title".to_string(), self.title.clone());
        variables.insert("generated_at".to_string(), Local::now().format(TIMESTAMP_FORMAT).to_string());

        {
            let regions = self.regions.lock();
            let pinned = self.pinned.lock();
            for region in Region::ALL {
                let key = region.id().replace('-', "_");
                let class = if pinned.contains(&region) { " scroll-end" } else { "" };
                variables.insert(format!("{}_class", key), class.to_string());
                variables.insert(key, regions.get(&region).cloned().unwrap_or_default());
            }
        }

        self.template_engine.render(PAGE_TEMPLATE, &variables)
            .map_err(|e| ThreatScopeError::SerializationError(
                format!("Failed to render page template: {}", e)))
    }

    /// Write the full page to disk
    pub async fn write_html(&self, output_path: &Path) -> ThreatScopeResult<()> {
        let html = self.render_page()?;

        tokio::fs::write(output_path, html).await
            .map_err(|e| ThreatScopeError::FileError {
                path: output_path.to_path_buf(),
                message: format!("Failed to write page: {}", e),
            })?;

        info!("Page written to {}", output_path.display());
        Ok(())
    }

    fn replace(&self, region: Region, markup: String) {
        debug!("Updating region {}", region);
        self.regions.lock().insert(region, markup);
        self.pinned.lock().remove(&region);
    }
}

impl DisplayPort for PageDisplay {
    fn set_loading(&self, region: Region) {
        self.replace(region, self.renderer.render_loading(region));
    }

    fn set_content(&self, region: Region, markup: String) {
        self.replace(region, markup);
    }

    fn set_error(&self, region: Region, message: &str) {
        self.replace(region, self.renderer.render_error(region, message));
    }

    fn scroll_to_latest(&self, region: Region) {
        self.pinned.lock().insert(region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regions_update_independently() {
        let page = PageDisplay::new("test");
        page.set_content(Region::Geo, "<p>geo</p>".to_string());
        page.set_loading(Region::Osint);
        page.set_error(Region::Sigint, "Analysis failed");

        assert!(page.region(Region::Osint).contains("<div class=\"loading\"></div>"));
        assert_eq!(page.region(Region::Geo), "<p>geo</p>");
        assert!(page.region(Region::Sigint).contains("<h3>SIGINT Analysis</h3>"));
        assert!(page.region(Region::Sigint).contains("Analysis failed"));
        assert_eq!(page.region(Region::History), "");
    }

    #[test]
    fn test_new_content_clears_scroll_mark() {
        let page = PageDisplay::new("test");
        page.set_content(Region::History, "<p>one</p>".to_string());
        page.scroll_to_latest(Region::History);
        assert!(page.is_pinned(Region::History));

        page.set_content(Region::History, "<p>two</p>".to_string());
        assert!(!page.is_pinned(Region::History));
    }

    #[test]
    fn test_region_markup_is_not_expanded_as_template() {
        let content = "details: {{ title }} {{ geo_results }}";
        for _ in 0..20 {
            let page = PageDisplay::new("ThreatScope");
            page.set_content(Region::Osint, content.to_string());
            page.set_content(Region::Geo, "<p>geo</p>".to_string());

            let html = page.render_page().unwrap();
            assert!(html.contains(&format!("<div id=\"osint-results\" class=\"panel\">{}</div>", content)));
            assert_eq!(html.matches("<p>geo</p>").count(), 1);
        }
    }

    #[tokio::test]
    async fn test_write_html() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");

        let page = PageDisplay::new("ThreatScope");
        page.set_content(Region::Osint, "<p>primary</p>".to_string());
        page.set_content(Region::History, "<p>history</p>".to_string());
        page.scroll_to_latest(Region::History);
        page.write_html(&path).await.unwrap();

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<title>ThreatScope</title>"));
        assert!(html.contains("<div id=\"osint-results\" class=\"panel\"><p>primary</p></div>"));
        assert!(html.contains("<div id=\"input-history\" class=\"panel scroll-end\"><p>history</p></div>"));
        assert!(!html.contains("{{"));
    }
}
