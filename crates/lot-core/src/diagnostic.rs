//! 診斷訊息
//!
//! 計算不會因為輸入資料異常而中斷，而是回傳安全的預設值並附上診斷，
//! 讓呼叫端可以分辨「正常計算」與「使用預設值」。

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 診斷嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// 單筆診斷
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 相關批次記錄（若可得）
    pub record_id: Option<Uuid>,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(record_id: Option<Uuid>, message: String, severity: Severity) -> Self {
        Self {
            record_id,
            message,
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(None, message.into(), Severity::Info)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(None, message.into(), Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(None, message.into(), Severity::Error)
    }

    /// 建構器模式：設置批次記錄
    pub fn for_record(mut self, record_id: Uuid) -> Self {
        self.record_id = Some(record_id);
        self
    }
}

/// 帶診斷的計算結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosed<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    /// 正常計算的結果
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// 是否沒有任何診斷
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// 是否含有指定嚴重程度以上的診斷
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }

    /// 拆成值與診斷
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }
}
