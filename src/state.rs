use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{MatcherError, Result};
use crate::voice_commands::{MatchResult, VoiceCommandMatcher};

/// 应用共享的匹配器句柄
///
/// 词典变化时构建一个新的匹配器再整体替换，正在查询的调用方继续使用旧索引。
#[derive(Debug, Default)]
pub struct MatcherState {
    current: RwLock<Option<Arc<VoiceCommandMatcher>>>,
}

impl MatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用已构建好的匹配器创建
    pub fn with_matcher(matcher: VoiceCommandMatcher) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(matcher))),
        }
    }

    /// 安装新的匹配器，返回被替换掉的旧匹配器
    pub fn install(&self, matcher: VoiceCommandMatcher) -> Option<Arc<VoiceCommandMatcher>> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = guard.replace(Arc::new(matcher));
        log::info!("指令匹配器已{}", if previous.is_some() { "更新" } else { "就绪" });
        previous
    }

    pub fn is_ready(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// 当前匹配器的快照
    pub fn snapshot(&self) -> Result<Arc<VoiceCommandMatcher>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(MatcherError::NotReady)
    }

    /// 匹配语音指令；匹配器未安装时返回 [`MatcherError::NotReady`]
    pub fn lookup(&self, raw: &str) -> Result<MatchResult> {
        Ok(self.snapshot()?.lookup(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice_commands::MatchMode;
    use std::thread;

    #[test]
    fn test_lookup_before_install_is_misuse() {
        let state = MatcherState::new();
        assert!(!state.is_ready());
        assert!(matches!(state.lookup("打开空调"), Err(MatcherError::NotReady)));
    }

    #[test]
    fn test_install_and_swap() {
        let state = MatcherState::new();
        assert!(state.install(VoiceCommandMatcher::build(["打开空调"])).is_none());
        let old = state.snapshot().unwrap();

        let previous = state.install(VoiceCommandMatcher::build(["打开窗户"]));
        assert!(previous.is_some());

        // 旧快照不受替换影响
        assert_eq!(old.lookup("开空调").mode, MatchMode::Exact);
        assert_eq!(state.lookup("开空调").unwrap().mode, MatchMode::Unrecognized);
        assert_eq!(
            state.lookup("开窗户").unwrap().command.as_deref(),
            Some("打开窗户")
        );
    }

    #[test]
    fn test_concurrent_readers() {
        let state = Arc::new(MatcherState::with_matcher(VoiceCommandMatcher::build([
            "打开空调",
            "关闭空调",
        ])));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let state = Arc::clone(&state);
                thread::spawn(move || {
                    (0..100)
                        .map(|_| state.lookup("关空掉啊").unwrap())
                        .all(|r| r.command.as_deref() == Some("关闭空调"))
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
