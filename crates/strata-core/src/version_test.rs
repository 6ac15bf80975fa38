use super::*;

#[test]
fn test_parse_init() {
    assert_eq!(VersionLabel::parse("init").unwrap(), VersionLabel::Init);
}

#[test]
fn test_parse_release() {
    let label = VersionLabel::parse("1.2.0").unwrap();
    assert_eq!(
        label,
        VersionLabel::Release(semver::Version::new(1, 2, 0))
    );
    assert_eq!(label.to_string(), "1.2.0");
}

#[test]
fn test_parse_malformed() {
    for name in ["1.2", "v1.2.0", "latest", "init2", ""] {
        let err = VersionLabel::parse(name).unwrap_err();
        assert!(matches!(err, CoreError::InvalidVersion { .. }), "{name}");
    }
}

#[test]
fn test_init_sorts_first() {
    let mut labels = vec![
        VersionLabel::parse("1.0.0").unwrap(),
        VersionLabel::parse("init").unwrap(),
        VersionLabel::parse("0.1.0").unwrap(),
    ];
    labels.sort();

    assert_eq!(labels[0], VersionLabel::Init);
    assert_eq!(labels[1].to_string(), "0.1.0");
    assert_eq!(labels[2].to_string(), "1.0.0");
}

#[test]
fn test_semver_order_not_lexicographic() {
    // "1.10.0" < "1.9.0" lexicographically; semver ordering must win.
    let mut labels = vec![
        VersionLabel::parse("1.10.0").unwrap(),
        VersionLabel::parse("1.9.0").unwrap(),
        VersionLabel::parse("1.2.0").unwrap(),
    ];
    labels.sort();

    let order: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
    assert_eq!(order, vec!["1.2.0", "1.9.0", "1.10.0"]);
}

#[test]
fn test_exceeds_ceiling() {
    let ceiling = semver::Version::new(1, 3, 0);

    assert!(!VersionLabel::Init.exceeds_ceiling(&ceiling));
    assert!(!VersionLabel::parse("1.3.0")
        .unwrap()
        .exceeds_ceiling(&ceiling));
    assert!(!VersionLabel::parse("1.2.9")
        .unwrap()
        .exceeds_ceiling(&ceiling));
    assert!(VersionLabel::parse("1.4.0")
        .unwrap()
        .exceeds_ceiling(&ceiling));
}
