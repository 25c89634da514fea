//! Show command - print a built-in template

use podplate_engine::catalog;

use crate::error::Result;

pub fn run(name: &str) -> Result<()> {
    let template = catalog::find(name)?;
    print!("{}", template.data);
    Ok(())
}
