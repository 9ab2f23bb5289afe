// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! File drop targets on a simulated page.
//!
//! Two sibling drop zones share one hover registry. The pointer wanders across
//! a zone's children, then drops a mix of files on each zone.
//!
//! Run:
//! - `cargo run -p understory_demos --example file_drop_basics`
//! - `RUST_LOG=debug cargo run -p understory_demos --example file_drop_basics`

use understory_demos::{Node, Page};
use understory_file_drop::file::FileInfo;
use understory_file_drop::registry::HoverRegistry;
use understory_file_drop::target::{Callbacks, DropOptions, DropStatus, DropTarget};

fn main() {
    env_logger::init();

    let mut page = Page::new();
    let body = page.body();
    let avatar = page.add(body, "avatar zone");
    let label = page.add(avatar, "avatar label");
    let gallery = page.add(body, "gallery zone");

    let registry = HoverRegistry::shared(body);

    let avatar_options = DropOptions::default().with_allowed_types(
        "image/png, image/jpeg"
            .parse()
            .expect("static pattern parses"),
    );
    let gallery_options: DropOptions = serde_json::from_str(
        r#"{ "allowMultiple": true, "allowedTypes": "image/*, video/*" }"#,
    )
    .expect("static options parse");
    println!(
        "gallery options: {}",
        serde_json::to_string(&gallery_options).expect("options serialize")
    );

    let mut avatar_zone = DropTarget::<Node, FileInfo>::new(&registry, avatar, avatar_options);
    let mut gallery_zone = DropTarget::<Node, FileInfo>::new(&registry, gallery, gallery_options);
    avatar_zone.attach().expect("avatar element is free");
    gallery_zone.attach().expect("gallery element is free");

    println!("== Drag across the avatar zone");
    let entered = registry.borrow_mut().drag_enter_at(body, &page);
    for event in &entered {
        println!("    {}", page.describe(event));
    }
    page.cross(&registry, body, avatar);
    page.cross(&registry, avatar, label);
    println!(
        "  avatar over self: {}, gallery over self: {}, gallery sees page drag: {}",
        avatar_zone.is_dragging_over_self(),
        gallery_zone.is_dragging_over_self(),
        gallery_zone.is_dragging_over_root(),
    );
    println!("  dragover effect on avatar: {}", avatar_zone.drag_over().as_str());

    println!("== Drop two files on the avatar label");
    let mut on_invalid = |f: &FileInfo| println!("    invalid type: {} ({})", f.name, f.mime_type);
    let mut on_dropped = |f: &FileInfo| println!("    dropped: {}", f.name);
    let outcome = avatar_zone.handle_drop(
        [
            FileInfo::new("me.png", "image/png").with_size(48_213),
            FileInfo::new("resume.pdf", "application/pdf"),
        ],
        &mut Callbacks::new(&mut on_invalid, &mut on_dropped),
    );
    for event in &outcome.transitions {
        println!("    {}", page.describe(event));
    }
    report(&outcome.status);
    println!(
        "  avatar file: {:?}, page still dragging: {}",
        avatar_zone.file().map(|f| f.name.as_str()),
        registry.borrow().is_dragging_over_root(),
    );

    println!("== Drag onto the gallery and drop a batch");
    registry.borrow_mut().drag_enter_at(body, &page);
    page.cross(&registry, body, gallery);
    let outcome = gallery_zone.handle_drop(
        [
            FileInfo::new("beach.jpg", "image/jpeg"),
            FileInfo::new("notes.txt", "text/plain"),
            FileInfo::new("waves.mp4", "video/mp4"),
        ],
        &mut Callbacks::new(&mut on_invalid, &mut on_dropped),
    );
    report(&outcome.status);
    let names: Vec<&str> = gallery_zone.files().iter().map(|f| f.name.as_str()).collect();
    println!("  gallery files: {names:?}");

    println!("== Gesture abandoned over the gallery");
    registry.borrow_mut().drag_enter_at(gallery, &page);
    for event in registry.borrow_mut().cancel() {
        println!("    {}", page.describe(&event));
    }

    gallery_zone.detach();
    println!(
        "== Gallery unmounted; attached targets left: {}",
        registry.borrow().target_count()
    );
}

fn report(status: &DropStatus) {
    match status {
        DropStatus::Empty => println!("  nothing dropped"),
        DropStatus::Delivered { accepted, rejected } => {
            println!("  accepted {accepted}, rejected {rejected}");
        }
        DropStatus::Detached => println!("  target was detached"),
    }
}
