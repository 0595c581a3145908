//! Shared fixtures for integration tests

use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A location page laid out like a page-builder site
pub const LOCATION_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head><title>Botox Scottsdale</title></head>
<body>
  <nav><a href="/">Home</a><a href="#pricing">Pricing</a><a href="/book">Book Now</a></nav>
  <h1>Botox® / Dysport® Scottsdale Arizona — ClubInject®</h1>
  <section id="pricing">
    <div><span>20 Units</span> <span>$150.80</span></div>
    <div><span>40 Units</span> <span>$280.00</span></div>
    <p>Members pay $9.72/month</p>
  </section>
  <div style="font-size: 40px;">About Us</div>
  <div style="font-size: 22px;">ClubInject is a group of nurse injectors who only do Botox.</div>
  <div style="font-size: 40px;">Pricing</div>
  <div style="font-size: 22px;">We charge $7.54 per unit of Botox for members.</div>
  <div style="font-size: 22px;">Memberships are just $9.72 a month.</div>
  <div style="font-size: 22px;">4.9 stars on Google from 800 clients</div>
  <footer>
    <p>7001 N Scottsdale Rd, Scottsdale, AZ 85253</p>
    <p>(480) 555-0100</p>
    <p>scottsdale@clubinject.com</p>
    <p>Mon-Sat 9AM-6PM</p>
    <a href="/book">Book</a>
  </footer>
</body>
</html>"##;

pub async fn mount_robots(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

pub async fn mount_page(server: &MockServer, page_path: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Writes `<dir>/<name>.toml` for a static structured run against `target`
///
/// Returns the storage path the configuration writes to.
pub fn write_config(dir: &Path, name: &str, target: &str) -> PathBuf {
    let storage = dir.join("data").join(format!("{}.csv", name));
    let content = format!(
        r#"
site_name = "{name}"
target_url = "{target}"
mode = "static"
parse_mode = "structured"

[storage]
path = "{storage}"

[fetch]
politeness_delay_ms = 0

[structured]
service_label = "Botox / Dysport"
locality = "Scottsdale"
region_tokens = ["AZ", "Arizona"]
"#,
        storage = storage.display()
    );
    std::fs::write(dir.join(format!("{}.toml", name)), content).expect("write config");
    storage
}
