use std::path::{Component, Path};

/// Directory components between the root and the file name, in order.
///
/// The path is normalized lexically first: `.` components vanish and `..`
/// removes the preceding segment. A platform prefix (a Windows drive such as
/// `E:`) is kept as the first segment, the root separator is not. Separator
/// handling follows `std::path` for the target platform.
pub fn segments<P: AsRef<Path>>(path: P) -> Vec<String> {
    let mut prefix: Option<String> = None;
    let mut names: Vec<String> = Vec::new();

    for component in path.as_ref().components() {
        match component {
            Component::Prefix(p) => prefix = Some(p.as_os_str().to_string_lossy().into_owned()),
            Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                names.pop();
            }
            Component::Normal(name) => names.push(name.to_string_lossy().into_owned()),
        }
    }

    // Final component is the file itself.
    names.pop();

    prefix.into_iter().chain(names).collect()
}
