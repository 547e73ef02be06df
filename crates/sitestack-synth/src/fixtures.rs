//! Test fixtures shared by the unit tests.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constructs::HandlerAssets;

/// Write a handler directory with every bundle under `root`, returning it.
pub(crate) fn write_handlers(root: &Path) -> PathBuf {
    let dir = root.join("handlers");
    for (bundle, file, body) in [
        ("s3-auto-delete-objects", "index.js", "exports.handler = async () => {};"),
        ("bucket-deployment", "index.py", "def handler(event, context):\n    pass\n"),
        ("awscli-layer", "awscli/aws", "#!/bin/sh\n"),
    ] {
        let path = dir.join(bundle).join(file);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write bundle");
    }
    dir
}

/// Staged handler bundles, with the directory holding them.
pub(crate) fn handlers() -> (HandlerAssets, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let handlers = HandlerAssets::stage(write_handlers(dir.path())).expect("stage handlers");
    (handlers, dir)
}

/// A site root with `web/index.html` and a handler directory.
pub(crate) fn site() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let web = dir.path().join("web");
    fs::create_dir(&web).expect("mkdir");
    fs::write(web.join("index.html"), "<h1>hi</h1>").expect("write");
    write_handlers(dir.path());
    dir
}
