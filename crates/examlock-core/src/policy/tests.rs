use super::*;

#[test]
fn nothing_is_protected_before_a_domain_is_set() {
    let policy = ProtectionPolicy::new();
    assert!(policy.protected_domain().is_none());
    assert!(!policy.is_protected("http://localhost:5000/exam"));
    assert!(!policy.is_protected("https://chat.openai.com/"));
}

#[test]
fn protects_every_tab_sharing_the_authority() {
    let policy = ProtectionPolicy::new();
    policy
        .set_protected_domain("http://localhost:5000/exam/session/42")
        .unwrap();

    assert_eq!(policy.protected_domain().as_deref(), Some("localhost:5000"));
    assert!(policy.is_protected("http://localhost:5000/exam"));
    assert!(policy.is_protected("http://localhost:5000/other/path?x=1"));
    assert!(!policy.is_protected("https://chat.openai.com/"));
}

#[test]
fn authority_comparison_is_exact() {
    let policy = ProtectionPolicy::new();
    policy.set_protected_domain("https://exam.example.com/").unwrap();

    assert!(policy.is_protected("https://exam.example.com/page"));
    // No subdomain or prefix matching.
    assert!(!policy.is_protected("https://sub.exam.example.com/"));
    assert!(!policy.is_protected("https://exam.example.com.evil.net/"));
    // Different port means a different authority.
    assert!(!policy.is_protected("https://exam.example.com:8443/"));
}

#[test]
fn rejects_urls_without_an_authority() {
    let policy = ProtectionPolicy::new();
    policy.set_protected_domain("http://localhost:5000/").unwrap();

    assert!(policy.set_protected_domain("not a url").is_err());
    assert!(policy.set_protected_domain("mailto:user@example.com").is_err());

    // A rejected update leaves the pinned domain untouched.
    assert_eq!(policy.protected_domain().as_deref(), Some("localhost:5000"));
    assert!(policy.is_protected("http://localhost:5000/exam"));
}

#[test]
fn unparseable_tab_urls_are_never_protected() {
    let policy = ProtectionPolicy::new();
    policy.set_protected_domain("http://localhost:5000/").unwrap();

    assert!(!policy.is_protected(""));
    assert!(!policy.is_protected("about:blank"));
    assert!(!policy.is_protected("chrome://settings"));
}
