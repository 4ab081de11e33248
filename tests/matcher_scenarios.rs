use logene_voice_command::{
    build_matcher, build_matcher_from_commands, normalize, strip_tail_particle, AppConfig,
    MatchMode, MatcherError, MatcherState, VoiceCommandMatcher,
};

fn household() -> VoiceCommandMatcher {
    VoiceCommandMatcher::build(["打开空调", "关闭空调", "打开窗户"])
}

#[test]
fn valid_lens_come_from_normalized_keys() {
    let matcher = household();
    let lens: Vec<usize> = matcher.valid_lens().iter().copied().collect();
    assert_eq!(lens, vec![3]);
}

#[test]
fn trailing_particle_then_exact() {
    let result = household().lookup("开空调啊");
    assert_eq!(result.mode, MatchMode::Exact);
    assert_eq!(result.command.as_deref(), Some("打开空调"));
}

#[test]
fn inserted_char_is_skipped() {
    let result = household().lookup("开空挑调");
    assert_eq!(result.mode, MatchMode::Fuzzy);
    assert_eq!(result.command.as_deref(), Some("打开空调"));
}

#[test]
fn substituted_last_char() {
    let result = household().lookup("开空掉");
    assert_eq!(result.mode, MatchMode::Fuzzy);
    assert_eq!(result.command.as_deref(), Some("打开空调"));
}

#[test]
fn nothing_within_one_edit() {
    let result = household().lookup("开电视");
    assert_eq!(result.mode, MatchMode::Unrecognized);
    assert_eq!(result.command, None);
}

#[test]
fn dictionary_spelling_is_normalized_first() {
    let result = household().lookup("打开空调");
    assert_eq!(result.normalized, "开空调");
    assert_eq!(result.mode, MatchMode::Exact);
    assert_eq!(result.command.as_deref(), Some("打开空调"));
}

#[test]
fn inserted_char_and_particle_together() {
    let result = household().lookup("关闭请空调呀");
    assert_eq!(result.command.as_deref(), Some("关闭空调"));
}

#[test]
fn length_gate_never_walks_the_tree() {
    let matcher = household();
    // 归一化后长度为 1、2、6，均不在 {3} ∪ {3 + 1} 内
    for query in ["开", "空调", "开空调快点来"] {
        let len = normalize(strip_tail_particle(query)).chars().count();
        assert!(len != 3 && len != 4, "{query} 长度 {len}");
        assert_eq!(matcher.lookup(query).mode, MatchMode::Unrecognized);
    }
    assert_eq!(matcher.trie().walks(), 0);
}

#[test]
fn two_edits_are_rejected() {
    let matcher = household();
    // 两次替换 / 一次替换 + 一次多字
    for query in ["开天气", "开空掉掉", "请开空掉"] {
        assert_eq!(
            matcher.trie().match_fuzzy_sub1(&normalize(query)),
            None,
            "{query}"
        );
    }
}

#[test]
fn shared_state_requires_install() {
    let state = MatcherState::new();
    assert!(matches!(state.lookup("开空调"), Err(MatcherError::NotReady)));

    state.install(household());
    assert_eq!(
        state.lookup("开空调").unwrap().command.as_deref(),
        Some("打开空调")
    );
}

#[test]
fn build_from_default_config() {
    let config = AppConfig::default();
    let matcher = build_matcher(&config).unwrap();
    assert!(matcher.length_check());

    let result = matcher.lookup("停用扫地机吧");
    assert_eq!(result.mode, MatchMode::Exact);
    assert_eq!(result.command.as_deref(), Some("停用扫地机"));

    let result = matcher.lookup("打开快台灯");
    assert_eq!(result.command.as_deref(), Some("打开台灯"));
}

#[test]
fn build_from_preloaded_commands() {
    let config = AppConfig::default();
    let commands = vec!["打开空调".to_string(), "关闭空调".to_string()];
    let matcher = build_matcher_from_commands(&config, &commands);
    assert_eq!(matcher.len(), 2);
    assert!(matcher.valid_lens().contains(&3));
    assert_eq!(matcher.lookup("关空掉").command.as_deref(), Some("关闭空调"));
}

#[test]
fn build_honours_length_check_setting() {
    let mut config = AppConfig::default();
    config.matcher.length_check = false;
    let matcher = build_matcher(&config).unwrap();
    assert!(!matcher.length_check());
}
