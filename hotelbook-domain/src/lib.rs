//! 酒店预订领域层（hotelbook-domain）
//!
//! 提供预订系统的核心领域构件：
//! - 实体（`entity`）与领域模型（`model`）：Room / Guest / Booking，
//!   以及正式预订之前的轻量报价记录 PreBooking；
//! - 预订状态机：CREATED → CONFIRMED / CANCELLED 的迁移规则；
//! - 乐观并发控制（`concurrency`）：基于 id + version 的资源指纹，
//!   支持条件读取（缓存重验证）与条件写入（过期写拒绝）；
//! - 规约（`specification`）：可组合的房间检索谓词，含日期区间可用性；
//! - 存储接口（`store`）：工作单元与实体存储的抽象，事务由实现方保证。
//!
//! 本 crate 不绑定任何存储或传输实现，具体后端（内存、数据库）由
//! 应用层提供并注入。
//!
pub mod concurrency;
pub mod entity;
pub mod error;
pub mod model;
pub mod specification;
pub mod store;
pub mod value_object;
