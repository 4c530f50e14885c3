//! # draftpilot
//!
//! LLM 驱动的论文写作助手后端，将浏览器端的写作请求转发给大模型。
//!
//! 浏览器客户端按写作模块（选题、提纲、初稿、润色、文献检索、引用插入）
//! 发起结构化请求，本服务负责：
//! - 从请求载荷构建扁平的提示词上下文（语言检测、参考文献截断、模型配置归一化）
//! - 按模块与语言渲染提示词模板
//! - 分发到 OpenAI 兼容 API 或 Gemini API
//! - 从模型的自由文本回复中恢复 JSON 并按模块校验成严格契约
//! - 失败时返回中英双语的扁平错误对象
//!
//! ## 快速开始
//! ```bash
//! cargo install draftpilot
//! draftpilot --port 8787
//! ```
//!
//! ### 作为库使用
//! ```ignore
//! use draftpilot::handler::relay_module;
//! use draftpilot::modules::Module;
//!
//! # async fn example(payload: serde_json::Value) {
//! let limits = draftpilot::config::LimitsConfig::default();
//! let network = draftpilot::config::NetworkConfig::default();
//! let reply = relay_module(Module::Topic, &payload, &limits, &network).await;
//! println!("{}", serde_json::to_string(&reply).unwrap());
//! # }
//! ```
//!
//! ## 核心模块
//! - [`context`] - 请求载荷到提示词上下文的转换
//! - [`prompt`] - 提示词目录与模板渲染
//! - [`llm`] - LLM provider 接口和实现
//! - [`handler`] - 按模块编排整条流水线
//! - [`server`] - axum HTTP 路由
//! - [`config`] - 配置管理
//! - [`error`] - 统一错误类型

#[macro_use]
extern crate rust_i18n;

pub mod cli;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod handler;
pub mod llm;
pub mod modules;
pub mod prompt;
pub mod server;

// Initialize i18n for library modules
i18n!("locales", fallback = "en");
