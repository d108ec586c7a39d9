//! Assessment Platform - 测验与作业评估平台后端服务
//!
//! 基于 Actix Web 构建，提供课程、题库、测验、作业、成绩册与 AI 辅助功能。
//!
//! # 架构
//! - `ai`: AI 提供方抽象（凭据解析、HTTP 客户端、各功能提示词）
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证、授权与限流中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（内存 / SeaORM）
//! - `utils`: 工具函数

pub mod ai;
pub mod config;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
