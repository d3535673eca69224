//! 展示层适配：修改成功提交后通知观察者。
//!
//! 核心数据类型里不放回调字段；需要“加载/缩放/改色/边距变化后刷新界面”的
//! 调用方用 `SessionAdapter` 包一层，在回调里自行调用 `preview()` 重新计算。

use std::path::Path;

use super::Session;
use crate::error::PatternError;

/// 会话上发生的修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Loaded,
    Resized,
    Recolored,
    MarginsChanged,
    Reset,
}

pub trait SessionObserver {
    fn on_change(&mut self, event: SessionEvent, session: &Session);
}

impl<F> SessionObserver for F
where
    F: FnMut(SessionEvent, &Session),
{
    fn on_change(&mut self, event: SessionEvent, session: &Session) {
        self(event, session)
    }
}

/// 带观察者的会话包装。修改失败时不会通知。
pub struct SessionAdapter<O: SessionObserver> {
    session: Session,
    observer: O,
}

impl<O: SessionObserver> SessionAdapter<O> {
    pub fn new(session: Session, observer: O) -> Self {
        Self { session, observer }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_parts(self) -> (Session, O) {
        (self.session, self.observer)
    }

    fn notify(&mut self, event: SessionEvent) {
        log::debug!("📣 会话事件：{:?}", event);
        self.observer.on_change(event, &self.session);
    }

    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), PatternError> {
        self.session.load_bytes(bytes)?;
        self.notify(SessionEvent::Loaded);
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), PatternError> {
        self.session.load_file(path)?;
        self.notify(SessionEvent::Loaded);
        Ok(())
    }

    pub fn resize(&mut self, height: i32, width: i32) -> Result<(), PatternError> {
        self.session.resize(height, width)?;
        self.notify(SessionEvent::Resized);
        Ok(())
    }

    pub fn recolor(&mut self, palette_size: i32) -> Result<(), PatternError> {
        self.session.recolor(palette_size)?;
        self.notify(SessionEvent::Recolored);
        Ok(())
    }

    pub fn set_margins(
        &mut self,
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    ) -> Result<(), PatternError> {
        self.session.set_margins(top, bottom, left, right)?;
        self.notify(SessionEvent::MarginsChanged);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), PatternError> {
        self.session.reset()?;
        self.notify(SessionEvent::Reset);
        Ok(())
    }
}
