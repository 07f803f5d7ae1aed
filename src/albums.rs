// src/albums.rs

use crate::models::AlbumRef;

/// Gallery albums in display order.
pub const GALLERY_ALBUMS: &[AlbumRef] = &[
    AlbumRef {
        name: "photoshoots",
        hash: "jwn4DPl",
    },
    AlbumRef {
        name: "graduation",
        hash: "LXNraCR",
    },
    AlbumRef {
        name: "pregnancy",
        hash: "hzyo7Fn",
    },
    AlbumRef {
        name: "family",
        hash: "7AbOjou",
    },
    AlbumRef {
        name: "creative",
        hash: "GrnEXll",
    },
    AlbumRef {
        name: "children",
        hash: "PFDlB2A",
    },
    AlbumRef {
        name: "event",
        hash: "ShX8W9o",
    },
    AlbumRef {
        name: "wedding",
        hash: "RZVXrPP",
    },
];

pub const CONTACT_ALBUM: AlbumRef = AlbumRef {
    name: "contact",
    hash: "DhgDWQS",
};

pub const ABOUT_ME_ALBUM: AlbumRef = AlbumRef {
    name: "about-me",
    hash: "cpEEnIy",
};
