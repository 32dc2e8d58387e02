pub mod paths;

pub use paths::{
    blastui_databases_dir, blastui_home, blastui_tools_dir, blastui_workspace_dir, config_path,
    describe_paths,
};
