use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisitReportError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("画像デコードエラー: {0}")]
    ImageDecode(String),

    #[error("PDF生成エラー: {0}")]
    Assembly(String),

    #[error("PDF保存エラー: {0}")]
    Persistence(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] visit_report_common::Error),
}

pub type Result<T> = std::result::Result<T, VisitReportError>;
