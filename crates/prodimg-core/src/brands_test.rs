use std::path::Path;

use super::*;

fn brand(key: &str, product_path: &str, image_pattern: &str) -> BrandConfig {
    BrandConfig {
        key: key.to_string(),
        base_url: "https://shop.example.com/".to_string(),
        product_path: product_path.to_string(),
        image_pattern: image_pattern.to_string(),
    }
}

#[test]
fn builtin_registry_has_all_vendors() {
    let registry = BrandRegistry::builtin();
    let keys: Vec<&str> = registry.keys().collect();
    assert_eq!(
        keys,
        vec![
            "bluemagic",
            "johnsens",
            "purecitrus",
            "quiksteel",
            "sprayx",
            "turbo108"
        ]
    );
    assert_eq!(registry.default_brand(), "johnsens");
}

#[test]
fn johnsens_product_url_uses_all_path() {
    let registry = BrandRegistry::builtin();
    let profile = registry.get("johnsens").unwrap();
    assert_eq!(
        profile.product_url("2212"),
        "https://www.johnsens.com/all/2212"
    );
}

#[test]
fn product_url_encodes_identifier_as_single_segment() {
    let registry = BrandRegistry::builtin();
    let profile = registry.get("bluemagic").unwrap();
    assert_eq!(
        profile.product_url("a/b c?d"),
        "https://www.bluemagicusa.com/products/a%2Fb%20c%3Fd"
    );
}

#[test]
fn resolve_without_key_uses_default() {
    let registry = BrandRegistry::builtin();
    assert_eq!(registry.resolve(None).unwrap().key(), "johnsens");
    assert_eq!(registry.resolve(Some("SprayX")).unwrap().key(), "sprayx");
    assert!(registry.resolve(Some("unknownbrand")).is_none());
}

#[test]
fn johnsens_rule_matches_cdn_url_in_markdown() {
    let registry = BrandRegistry::builtin();
    let profile = registry.get("johnsens").unwrap();
    let markdown = "![Brake fluid](https://cdn11.bigcommerce.com/s-fg8rw4u4uq/images/stencil/1280x1280/products/32/189/2212__05798.1515075711.png?c=2)";
    assert_eq!(
        profile.extract_image(markdown).as_deref(),
        Some("https://cdn11.bigcommerce.com/s-fg8rw4u4uq/images/stencil/1280x1280/products/32/189/2212__05798.1515075711.png?c=2")
    );
}

#[test]
fn johnsens_rule_ignores_thumbnails() {
    let registry = BrandRegistry::builtin();
    let profile = registry.get("johnsens").unwrap();
    let markdown = "https://cdn11.bigcommerce.com/s-fg8rw4u4uq/images/stencil/160x160/products/32/189/2212.png?c=2";
    assert!(profile.extract_image(markdown).is_none());
}

#[test]
fn generic_rule_returns_first_image_url() {
    let registry = BrandRegistry::builtin();
    let profile = registry.get("quiksteel").unwrap();
    let markdown = "Intro text\n![hero](https://cdn.quiksteel.com/files/hero.JPG) and \
                    ![alt](https://cdn.quiksteel.com/files/second.webp)";
    assert_eq!(
        profile.extract_image(markdown).as_deref(),
        Some("https://cdn.quiksteel.com/files/hero.JPG")
    );
}

#[test]
fn generic_rule_returns_none_without_images() {
    let registry = BrandRegistry::builtin();
    let profile = registry.get("turbo108").unwrap();
    assert!(profile
        .extract_image("no images here, just https://turbo108.com/about")
        .is_none());
}

#[test]
fn from_config_rejects_missing_placeholder() {
    let err = BrandProfile::from_config(&brand("acme", "/products/", "x")).unwrap_err();
    assert!(err.to_string().contains("{item}"), "got: {err}");
}

#[test]
fn from_config_rejects_bad_regex() {
    let err = BrandProfile::from_config(&brand("acme", "/p/{item}", "(unclosed")).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidPattern { ref brand, .. } if brand == "acme"));
}

#[test]
fn from_config_rejects_non_http_base_url() {
    let mut config = brand("acme", "/p/{item}", "x");
    config.base_url = "shop.example.com".to_string();
    let err = BrandProfile::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("http(s)"), "got: {err}");
}

#[test]
fn from_config_normalizes_key_and_paths() {
    let profile = BrandProfile::from_config(&brand(" Acme ", "p/{item}", "x")).unwrap();
    assert_eq!(profile.key(), "acme");
    assert_eq!(profile.base_url(), "https://shop.example.com");
    assert_eq!(profile.product_url("7"), "https://shop.example.com/p/7");
}

#[test]
fn from_file_rejects_duplicate_keys() {
    let file = BrandsFile {
        default_brand: None,
        brands: vec![brand("acme", "/a/{item}", "x"), brand("ACME", "/b/{item}", "y")],
    };
    let err = BrandRegistry::from_file(&file).unwrap_err();
    assert!(err.to_string().contains("duplicate brand key"), "got: {err}");
}

#[test]
fn from_file_rejects_unknown_default() {
    let file = BrandsFile {
        default_brand: Some("missing".to_string()),
        brands: vec![brand("acme", "/a/{item}", "x")],
    };
    let err = BrandRegistry::from_file(&file).unwrap_err();
    assert!(err.to_string().contains("default brand"), "got: {err}");
}

#[test]
fn from_file_defaults_to_first_brand_when_unset() {
    let file = BrandsFile {
        default_brand: None,
        brands: vec![brand("acme", "/a/{item}", "x"), brand("zeta", "/z/{item}", "y")],
    };
    let registry = BrandRegistry::from_file(&file).unwrap();
    assert_eq!(registry.default_brand(), "acme");
}

#[test]
fn from_file_rejects_empty_brand_list() {
    let file = BrandsFile {
        default_brand: None,
        brands: vec![],
    };
    assert!(BrandRegistry::from_file(&file).is_err());
}

#[test]
fn load_brand_registry_without_path_uses_builtin() {
    let registry = load_brand_registry(None, Some("sprayx")).unwrap();
    assert_eq!(registry.default_brand(), "sprayx");
    assert_eq!(registry.profiles().count(), 6);
}

#[test]
fn load_brand_registry_reports_missing_file() {
    let err = load_brand_registry(Some(Path::new("/nonexistent/brands.yaml")), None)
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileIo { .. }), "got: {err:?}");
}

#[test]
fn load_brand_registry_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("brands.yaml");
    assert!(path.exists(), "brands.yaml missing at {path:?}");
    let result = load_brand_registry(Some(&path), None);
    assert!(result.is_ok(), "failed to load brands.yaml: {result:?}");
    let registry = result.unwrap();
    assert!(registry.get("johnsens").is_some());
    assert!(registry.get("sprayx").is_some());
}

fn brands_yaml(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(&mut file, content.as_bytes()).unwrap();
    file
}

const ACME_ONLY: &str = r#"
default_brand: acme
brands:
  - key: acme
    base_url: https://shop.acme.test
    product_path: /p/{item}
    image_pattern: 'https://cdn\.acme\.test/[^"\s]+\.png'
"#;

#[test]
fn load_brand_registry_keeps_file_default_without_override() {
    let file = brands_yaml(ACME_ONLY);
    let registry = load_brand_registry(Some(file.path()), None).unwrap();
    assert_eq!(registry.default_brand(), "acme");
    assert_eq!(registry.resolve(None).unwrap().key(), "acme");
}

#[test]
fn load_brand_registry_override_must_name_a_defined_brand() {
    let file = brands_yaml(ACME_ONLY);
    let err = load_brand_registry(Some(file.path()), Some("johnsens")).unwrap_err();
    assert!(err.to_string().contains("default brand"), "got: {err}");
}
