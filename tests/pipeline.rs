use phishscan::features::FEATURE_NAMES;
use phishscan::model::{DecisionTree, ModelArtifact, TreeNode};
use phishscan::{Method, ModelInferenceEngine, PhishingAnalyzer};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// One stump on `having_IP_Address` and one on `having_At_Symbol`
fn write_forest(dir: &TempDir, columns: &[&str]) -> (PathBuf, PathBuf) {
    let ip = columns
        .iter()
        .position(|c| *c == "having_IP_Address")
        .unwrap();
    let at = columns
        .iter()
        .position(|c| *c == "having_At_Symbol")
        .unwrap();

    let stump = |feature: usize| DecisionTree {
        nodes: vec![
            TreeNode::Split {
                feature,
                threshold: 0.5,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf {
                value: [95.0, 5.0],
            },
            TreeNode::Leaf {
                value: [5.0, 95.0],
            },
        ],
    };

    let artifact = ModelArtifact::RandomForest {
        n_features: columns.len(),
        trees: vec![stump(ip), stump(at)],
    };

    let model_path = dir.path().join("phishing_model.json");
    let columns_path = dir.path().join("model_features.json");
    artifact.to_file(&model_path).unwrap();
    std::fs::write(&columns_path, serde_json::to_string(columns).unwrap()).unwrap();
    (model_path, columns_path)
}

#[test]
fn test_model_path_with_full_schema() {
    let dir = TempDir::new().unwrap();
    let (model_path, columns_path) = write_forest(&dir, &FEATURE_NAMES);

    let engine = Arc::new(ModelInferenceEngine::new());
    let outcome = engine.load_model(&model_path, &columns_path);
    assert!(outcome.success);
    assert_eq!(outcome.features.unwrap().len(), FEATURE_NAMES.len());

    let analyzer = PhishingAnalyzer::new(engine);

    let response = analyzer.classify("http://192.168.1.1@evil.tld/");
    let report = response.report().unwrap();
    assert_eq!(report.result.method, Method::Model);
    assert!(report.result.missing_features.is_empty());
    assert!(report.result.is_phishing);
    assert!((report.result.confidence - 0.95).abs() < 1e-9);
    assert!(report.warning.is_none());

    let response = analyzer.classify("https://www.wikipedia.org/");
    let report = response.report().unwrap();
    assert!(!report.result.is_phishing);
    // model confidence is the phishing probability even for a legitimate verdict
    assert!((report.result.confidence - 0.05).abs() < 1e-9);
    let probabilities = report.result.probabilities.unwrap();
    assert!((probabilities.legitimate - 0.95).abs() < 1e-9);
}

#[test]
fn test_column_drift_reports_missing_features() {
    let dir = TempDir::new().unwrap();
    let columns = [
        "having_IP_Address",
        "having_At_Symbol",
        "whois_registrar_age",
        "page_rank",
    ];
    let (model_path, columns_path) = write_forest(&dir, &columns);

    let engine = Arc::new(ModelInferenceEngine::new());
    assert!(engine.load(&model_path, &columns_path));
    let analyzer = PhishingAnalyzer::new(engine);

    let response = analyzer.classify("http://example.com/");
    let report = response.report().unwrap();
    assert_eq!(
        report.result.missing_features,
        vec!["whois_registrar_age", "page_rank"]
    );
    assert_eq!(report.warning.as_deref(), Some("2 features unavailable"));
}

#[test]
fn test_unloadable_model_uses_rules() {
    let dir = TempDir::new().unwrap();
    let engine = Arc::new(ModelInferenceEngine::new());
    assert!(!engine.load(
        dir.path().join("missing.json"),
        dir.path().join("missing_columns.json")
    ));

    let analyzer = PhishingAnalyzer::new(engine);
    let response = analyzer.classify("bit.ly/abc");
    let report = response.report().unwrap();
    assert_eq!(report.result.method, Method::RuleBased);
    assert!(!report.result.is_phishing);
    assert!((report.result.confidence - 0.75).abs() < 1e-9);
    assert_eq!(
        report.explanation,
        "Detected features: URL shortening service"
    );
}

#[test]
fn test_extract_features_is_total_and_stable() {
    let analyzer = PhishingAnalyzer::new(Arc::new(ModelInferenceEngine::new()));
    for url in ["", "://", "http://", "ftp://x", "%%%", "http://a@b@c//d"] {
        let first = analyzer.extract_features(url);
        let second = analyzer.extract_features(url);
        assert_eq!(first, second);
        assert_eq!(
            first.names().collect::<Vec<_>>(),
            FEATURE_NAMES.to_vec(),
            "{:?}",
            url
        );
    }
}
