use std::fmt;

#[derive(Debug, Clone)]
pub enum ConfigFormError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Declaration(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    FileOperation(String),
}

impl ConfigFormError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ConfigFormError::DatabaseConfig(_) => "E001",
            ConfigFormError::DatabaseConnection(_) => "E002",
            ConfigFormError::DatabaseOperation(_) => "E003",
            ConfigFormError::Declaration(_) => "E004",
            ConfigFormError::Validation(_) => "E005",
            ConfigFormError::NotFound(_) => "E006",
            ConfigFormError::Serialization(_) => "E007",
            ConfigFormError::FileOperation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ConfigFormError::DatabaseConfig(_) => "Database Configuration Error",
            ConfigFormError::DatabaseConnection(_) => "Database Connection Error",
            ConfigFormError::DatabaseOperation(_) => "Database Operation Error",
            ConfigFormError::Declaration(_) => "Form Declaration Error",
            ConfigFormError::Validation(_) => "Validation Error",
            ConfigFormError::NotFound(_) => "Resource Not Found",
            ConfigFormError::Serialization(_) => "Serialization Error",
            ConfigFormError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ConfigFormError::DatabaseConfig(msg) => msg,
            ConfigFormError::DatabaseConnection(msg) => msg,
            ConfigFormError::DatabaseOperation(msg) => msg,
            ConfigFormError::Declaration(msg) => msg,
            ConfigFormError::Validation(msg) => msg,
            ConfigFormError::NotFound(msg) => msg,
            ConfigFormError::Serialization(msg) => msg,
            ConfigFormError::FileOperation(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ConfigFormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ConfigFormError {}

// 便捷的构造函数
impl ConfigFormError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::DatabaseOperation(msg.into())
    }

    pub fn declaration<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::Declaration(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ConfigFormError::FileOperation(msg.into())
    }
}

impl From<sea_orm::DbErr> for ConfigFormError {
    fn from(err: sea_orm::DbErr) -> Self {
        ConfigFormError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ConfigFormError {
    fn from(err: std::io::Error) -> Self {
        ConfigFormError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigFormError {
    fn from(err: serde_json::Error) -> Self {
        ConfigFormError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigFormError>;
