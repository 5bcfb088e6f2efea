//! The canvas tool catalog for Orim.
//!
//! Twelve tools let the agent create, change, arrange and inspect objects on
//! a board. Only `arrangeObjects` and `getBoardState` touch the store; every
//! other tool is a pure function of its arguments.

pub mod arrange;
pub mod board_state;
pub mod create;
pub mod defaults;
pub mod manipulate;

use orim_core::tool::{ToolCatalog, ToolContext};

/// Tool names in catalog order.
pub const TOOL_NAMES: [&str; 12] = [
    "createStickyNote",
    "createShape",
    "createFrame",
    "createConnector",
    "createFreedraw",
    "moveObject",
    "resizeObject",
    "updateText",
    "changeColor",
    "deleteObject",
    "arrangeObjects",
    "getBoardState",
];

/// Build the full catalog bound to one board.
pub fn build_catalog(ctx: ToolContext) -> ToolCatalog {
    let mut catalog = ToolCatalog::new(ctx);
    catalog.register(Box::new(create::CreateStickyNoteTool));
    catalog.register(Box::new(create::CreateShapeTool));
    catalog.register(Box::new(create::CreateFrameTool));
    catalog.register(Box::new(create::CreateConnectorTool));
    catalog.register(Box::new(create::CreateFreedrawTool));
    catalog.register(Box::new(manipulate::MoveObjectTool));
    catalog.register(Box::new(manipulate::ResizeObjectTool));
    catalog.register(Box::new(manipulate::UpdateTextTool));
    catalog.register(Box::new(manipulate::ChangeColorTool));
    catalog.register(Box::new(manipulate::DeleteObjectTool));
    catalog.register(Box::new(arrange::ArrangeObjectsTool));
    catalog.register(Box::new(board_state::GetBoardStateTool));
    catalog
}
