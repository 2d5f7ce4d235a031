//! 房间服务
//!
//! 封装房间的读写与检索：
//! - 条件读取/条件写入：以资源指纹实现缓存重验证与过期写拒绝，
//!   指纹格式属于领域核心（接口层只负责映射到条件请求头）；
//! - 新建/删除（编码唯一性、容量与价格规则校验）；
//! - 组合规约检索 + 排序 + 分页。
//!
use std::sync::Arc;

use tracing::{info, warn};

use hotelbook_domain::concurrency::{
    Fingerprint, ReadEvaluation, WriteEvaluation, evaluate_conditional_read,
    evaluate_conditional_write,
};
use hotelbook_domain::entity::{Entity, RoomId};
use hotelbook_domain::error::DomainError;
use hotelbook_domain::model::{NewRoom, Room, RoomPatch};
use hotelbook_domain::specification::RoomSearchCriteria;
use hotelbook_domain::store::{EntityStore, UnitOfWork};

use crate::dto::{RoomDetail, RoomPage, RoomRead, SortDirection, SortKey};
use crate::error::AppError;

const DEFAULT_PAGE_SIZE: usize = 10;

pub struct RoomService<S> {
    store: Arc<S>,
}

impl<S> RoomService<S>
where
    S: EntityStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// 读取房间详情，支持条件读取
    ///
    /// 调用方携带的指纹与当前一致时返回 `Unchanged`，省略负载。
    pub async fn get_room(
        &self,
        id: RoomId,
        supplied: Option<&Fingerprint>,
    ) -> Result<RoomRead, AppError> {
        let room = self
            .store
            .find_room(id)
            .await?
            .ok_or_else(|| DomainError::not_found(Room::KIND, id))?;
        let fingerprint = Fingerprint::room(id, room.version());

        match evaluate_conditional_read(&fingerprint, supplied) {
            ReadEvaluation::Unchanged => {
                info!(room_id = id, %fingerprint, "room unchanged, short-circuiting read");
                Ok(RoomRead::Unchanged { fingerprint })
            }
            ReadEvaluation::Changed => Ok(RoomRead::Fresh {
                room: RoomDetail::from(&room),
                fingerprint,
            }),
        }
    }

    /// 更新房间，支持条件写入
    ///
    /// 携带过期指纹的写入以 `Conflict` 拒绝并回传当前指纹，房间不被
    /// 触碰；未携带指纹则按 best effort 写入。成功提交后版本恰好加
    /// 一，新指纹由提交后的版本派生。
    pub async fn update_room(
        &self,
        id: RoomId,
        patch: RoomPatch,
        expected: Option<&Fingerprint>,
    ) -> Result<(RoomDetail, Fingerprint), AppError> {
        info!(room_id = id, with_fingerprint = expected.is_some(), "updating room");
        let expected = expected.cloned();

        let (detail, fingerprint) = self
            .store
            .run_in_transaction(move |uow| {
                let mut room = uow
                    .room(id)?
                    .ok_or_else(|| DomainError::not_found(Room::KIND, id))?;

                let current = Fingerprint::room(id, room.version());
                if let Some(supplied) = expected.as_ref() {
                    if evaluate_conditional_write(&current, Some(supplied))
                        == WriteEvaluation::Conflict
                    {
                        warn!(
                            room_id = id,
                            %supplied,
                            %current,
                            "stale fingerprint, rejecting room update"
                        );
                        return Err(DomainError::Conflict { current });
                    }
                }

                room.apply_patch(&patch)?;

                // 提交协议保证版本恰好加一；在事务内据此派生新指纹，
                // 避免提交后再次读取时混入其他写入者的变更
                let fingerprint = Fingerprint::room(id, room.version().next());
                let detail = RoomDetail::from(&room);
                uow.put_room(room);
                Ok((detail, fingerprint))
            })
            .await?;

        info!(room_id = id, %fingerprint, "room updated");
        Ok((detail, fingerprint))
    }

    /// 新建房间
    ///
    /// 编码裁剪后必须非空且全局唯一（忽略大小写）；容量与价格遵循
    /// 领域规则。新房间默认激活，初始版本为 0。
    pub async fn create_room(&self, new_room: NewRoom) -> Result<RoomDetail, AppError> {
        new_room.validate()?;
        let code = new_room.normalized_code()?.to_string();

        let duplicated = self
            .store
            .all_rooms()
            .await?
            .iter()
            .any(|room| room.code().trim().eq_ignore_ascii_case(&code));
        if duplicated {
            return Err(DomainError::InvalidValue {
                reason: format!("a room with code {code} already exists"),
            }
            .into());
        }

        let normalized = NewRoom::builder()
            .code(code)
            .name(new_room.name.trim().to_string())
            .capacity(new_room.capacity)
            .base_price_per_night(new_room.base_price_per_night)
            .build();

        let room = self.store.insert_room(normalized).await?;
        info!(room_id = room.id(), code = room.code(), "room created");
        Ok(RoomDetail::from(&room))
    }

    /// 删除房间
    pub async fn delete_room(&self, id: RoomId) -> Result<(), AppError> {
        self.store.remove_room(id).await?;
        info!(room_id = id, "room deleted");
        Ok(())
    }

    /// 检索房间并分页
    ///
    /// 条件全部缺失时返回全部房间，仅按排序字段排序；页码与页大小
    /// 做归一化处理（负页码归零、非正页大小回落为默认值、越界页码
    /// 收敛到最后一页）。
    pub async fn search_rooms(
        &self,
        criteria: &RoomSearchCriteria,
        page: i64,
        size: i64,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<RoomPage, AppError> {
        let sort_key = SortKey::parse(sort);
        let sort_direction = SortDirection::parse(direction);
        info!(page, size, ?sort_key, ?sort_direction, "searching rooms");

        let mut rooms = self.store.query_rooms(criteria).await?;
        sort_rooms(&mut rooms, sort_key, sort_direction);

        let page = page.max(0) as usize;
        let size = if size <= 0 { DEFAULT_PAGE_SIZE } else { size as usize };

        Ok(build_page(rooms, page, size, sort_key, sort_direction))
    }
}

fn sort_rooms(rooms: &mut [Room], key: SortKey, direction: SortDirection) {
    rooms.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Id => a.id().cmp(&b.id()),
            SortKey::Code => a.code().to_lowercase().cmp(&b.code().to_lowercase()),
            SortKey::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            SortKey::Capacity => a.capacity().cmp(&b.capacity()),
            SortKey::BasePricePerNight => {
                a.base_price_per_night().cmp(&b.base_price_per_night())
            }
            SortKey::Active => a.active().cmp(&b.active()),
        };
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

fn build_page(
    rooms: Vec<Room>,
    page: usize,
    size: usize,
    sort: SortKey,
    direction: SortDirection,
) -> RoomPage {
    let total_elements = rooms.len();
    let total_pages = total_elements.div_ceil(size);

    // 越界页码收敛到最后一页（存在数据时）
    let page = if total_pages > 0 && page >= total_pages {
        total_pages - 1
    } else {
        page
    };

    let from = page * size;
    let to = (from + size).min(total_elements);
    let content = if from >= to {
        Vec::new()
    } else {
        rooms[from..to].iter().map(RoomDetail::from).collect()
    };

    RoomPage {
        content,
        page,
        size,
        total_elements,
        total_pages,
        first: total_pages == 0 || page == 0,
        last: total_pages == 0 || page + 1 >= total_pages,
        sort,
        direction,
    }
}
