pub mod channel_map;
pub mod decompose;
pub mod grid;

use channel_map::ChannelMap;
use chandec_common::db::core::LayoutDb;
use chandec_common::db::indices::DefId;
use chandec_common::geom::rect::Rect;
use chandec_common::util::config::DecomposeConfig;

/// Decomposes `target` over the configured area (its bounding box when none
/// is set) and returns the channel cell with the normalized area.
pub fn decompose_cell<H>(
    db: &mut LayoutDb,
    target: DefId,
    config: &DecomposeConfig,
    channels: &mut ChannelMap<H>,
) -> Option<(DefId, Rect)> {
    let mut area = config.area_rect().unwrap_or(db.def(target).bbox);
    let def = decompose::decompose_named(
        db,
        target,
        &mut area,
        config.netlist.as_deref(),
        config,
        channels,
    )?;
    Some((def, area))
}
