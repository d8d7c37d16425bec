pub mod log;

use crate::Result;
use std::{fs, path::Path};

pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        Ok(false)
    } else {
        fs::create_dir_all(dir)?;
        Ok(true)
    }
}

pub fn banner() -> String {
    format!(
        r#"
    ____             __      __  __                      __
   / __ \____  _____/ /__   / / / /___  __  ______  ____/ /
  / / / / __ \/ ___/ //_/  / /_/ / __ \/ / / / __ \/ __  /
 / /_/ / /_/ / /  / ,<    / __  / /_/ / /_/ / / / / /_/ /
/_____/\____/_/  /_/|_|  /_/ /_/\____/\__,_/_/ /_/\__,_/

Dork Hound v{}
"#,
        env!("CARGO_PKG_VERSION")
    )
}
