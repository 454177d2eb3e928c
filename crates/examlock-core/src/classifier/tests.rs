use super::*;

#[test]
fn matches_known_executables_exactly() {
    let classifier = AiAppClassifier::default();
    assert!(classifier.is_ai_application("claude.exe"));
    assert!(classifier.is_ai_application("ChatGPT.exe"));
    assert!(classifier.is_ai_application("CURSOR.EXE"));
}

#[test]
fn matches_keywords_as_substrings() {
    let classifier = AiAppClassifier::default();
    assert!(classifier.is_ai_application("Cursor.exe"));
    assert!(classifier.is_ai_application("my-llm-server"));
    assert!(classifier.is_ai_application("copilot-agent"));
    assert!(classifier.is_ai_application("gpt4all"));
}

#[test]
fn ignores_unrelated_processes() {
    let classifier = AiAppClassifier::default();
    assert!(!classifier.is_ai_application("firefox"));
    assert!(!classifier.is_ai_application("notepad.exe"));
    assert!(!classifier.is_ai_application("systemd"));
}

#[test]
fn substring_false_positives_are_accepted() {
    // "bombardier" contains "bard". The heuristic accepts this; narrowing
    // it is a table edit, not a matching change.
    let classifier = AiAppClassifier::default();
    assert!(classifier.is_ai_application("bombardier.exe"));
}

#[test]
fn classification_is_pure() {
    let classifier = AiAppClassifier::default();
    for name in ["Cursor.exe", "firefox", "llm-runner", ""] {
        assert_eq!(
            classifier.is_ai_application(name),
            classifier.is_ai_application(name)
        );
    }
}

#[test]
fn custom_tables_replace_the_built_ins() {
    let classifier = AiAppClassifier::with_tables(
        vec![String::from("Target.exe")],
        vec![String::from("SLEEPY")],
    );
    assert!(classifier.is_ai_application("target.exe"));
    assert!(classifier.is_ai_application("very-sleepy-daemon"));
    assert!(!classifier.is_ai_application("claude.exe"));
}
