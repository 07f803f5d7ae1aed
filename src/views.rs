// src/views.rs

use maud::{DOCTYPE, Markup, html};

use crate::models::{AlbumImages, ImageRef, SiteMetadata};

fn page(title: &str, metadata: &SiteMetadata, content: Markup) -> Markup {
    let site_name = if metadata.name.is_empty() {
        "Portfolio"
    } else {
        metadata.name.as_str()
    };

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " | " (site_name) }
                link rel="stylesheet" href="/static/css/styles.css";
            }
            body {
                header .site-header {
                    a .brand href="/" { (site_name) }
                    nav {
                        a href="/" { "Home" }
                        a href="/gallery" { "Gallery" }
                        a href="/about-me" { "About me" }
                        a href="/contact" { "Contact" }
                    }
                }
                main #content { (content) }
                (footer(metadata))
            }
        }
    }
}

fn footer(metadata: &SiteMetadata) -> Markup {
    let socials = [
        ("Instagram", &metadata.instagram),
        ("Twitter", &metadata.twitter),
        ("Telegram", &metadata.telegram),
        ("Facebook", &metadata.facebook),
    ];

    html! {
        footer .site-footer {
            @if !metadata.email.is_empty() {
                a href=(format!("mailto:{}", metadata.email)) { (metadata.email) }
            }
            @if !metadata.number.is_empty() {
                span .phone { (metadata.number) }
            }
            ul .socials {
                @for (label, link) in socials {
                    @if !link.is_empty() {
                        li { a href=(link) target="_blank" rel="noopener" { (label) } }
                    }
                }
            }
        }
    }
}

fn image_grid(images: &[ImageRef]) -> Markup {
    html! {
        div .image-grid {
            @for image in images {
                img src=(image.link) loading="lazy" alt="";
            }
        }
    }
}

fn album_section(album: &AlbumImages) -> Markup {
    html! {
        section .album id=(album.name) {
            h2 { (album.name) }
            @match &album.images {
                Some(images) if images.is_empty() => {
                    p .empty { "No photos yet." }
                }
                Some(images) => {
                    (image_grid(images))
                }
                None => {
                    p .unavailable { "Photos are temporarily unavailable." }
                }
            }
        }
    }
}

pub fn home(metadata: &SiteMetadata, albums: &[AlbumImages], wall: &[String]) -> Markup {
    page(
        "Home",
        metadata,
        html! {
            section .hero {
                @if !metadata.bio.is_empty() { p .bio { (metadata.bio) } }
            }
            section .wall {
                @for link in wall {
                    img src=(link) loading="lazy" alt="";
                }
            }
            nav .album-links {
                @for album in albums {
                    a href=(format!("/gallery#{}", album.name)) { (album.name) }
                }
            }
        },
    )
}

pub fn gallery(metadata: &SiteMetadata, albums: &[AlbumImages]) -> Markup {
    page(
        "Gallery",
        metadata,
        html! {
            h1 { "Gallery" }
            @for album in albums { (album_section(album)) }
        },
    )
}

pub fn contact(metadata: &SiteMetadata, images: &[ImageRef]) -> Markup {
    page(
        "Contact",
        metadata,
        html! {
            h1 { "Contact" }
            (image_grid(images))
            dl .contact-details {
                @if !metadata.email.is_empty() { dt { "Email" } dd { (metadata.email) } }
                @if !metadata.number.is_empty() { dt { "Phone" } dd { (metadata.number) } }
                @if !metadata.address.is_empty() { dt { "Address" } dd { (metadata.address) } }
            }
        },
    )
}

pub fn about_me(metadata: &SiteMetadata, images: &[ImageRef]) -> Markup {
    page(
        "About me",
        metadata,
        html! {
            h1 { "About me" }
            (image_grid(images))
            @if !metadata.about_me_info.is_empty() { p .about { (metadata.about_me_info) } }
        },
    )
}

pub fn admin(metadata: &SiteMetadata, admin_path: &str, gallery_edit_path: &str) -> Markup {
    let fields = [
        ("address", "Address", &metadata.address),
        ("number", "Phone number", &metadata.number),
        ("email", "Email", &metadata.email),
        ("instagram", "Instagram", &metadata.instagram),
        ("twitter", "Twitter", &metadata.twitter),
        ("telegram", "Telegram", &metadata.telegram),
        ("facebook", "Facebook", &metadata.facebook),
    ];

    page(
        "Admin",
        metadata,
        html! {
            h1 { "Site details" }
            p { "Leave a field empty to keep its current value." }
            form method="post" action=(format!("/{}", admin_path)) {
                @for (name, label, current) in fields {
                    label for=(name) { (label) }
                    input type="text" id=(name) name=(name) placeholder=(current);
                }
                label for="aboutMeInfo" { "About me" }
                textarea id="aboutMeInfo" name="aboutMeInfo" placeholder=(metadata.about_me_info) {}
                label for="bio" { "Bio" }
                textarea id="bio" name="bio" placeholder=(metadata.bio) {}
                button type="submit" { "Save" }
            }
            a href=(gallery_edit_path) { "Edit gallery" }
        },
    )
}

fn editable_album(name: &str, hash: &str, images: &[ImageRef]) -> Markup {
    html! {
        section .gallery-edit-album {
            h2 { (name) }
            div .upload {
                input .albumHash type="hidden" value=(hash);
                input .fileInput type="file" accept="image/png,image/jpeg,image/webp" hidden;
                button .uploadButton type="button" { "Add image" }
            }
            div .image-grid {
                @for image in images {
                    div .gallery-edit-item {
                        img src=(image.link) loading="lazy" alt="";
                        button .edit-delete-button type="button" data-image-id=(image.id) { "Delete" }
                    }
                }
            }
        }
    }
}

pub fn gallery_edit(
    metadata: &SiteMetadata,
    albums: &[AlbumImages],
    page_albums: &[AlbumImages],
) -> Markup {
    page(
        "Edit gallery",
        metadata,
        html! {
            h1 { "Edit gallery" }
            @for album in albums.iter().chain(page_albums) {
                (editable_album(album.name, album.hash, album.images()))
            }
            script src="/static/js/gallery_edit.js" {}
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::image;

    fn metadata() -> SiteMetadata {
        SiteMetadata {
            name: "Lens & Light".to_string(),
            email: "hello@example.com".to_string(),
            instagram: "https://instagram.com/lens".to_string(),
            ..SiteMetadata::default()
        }
    }

    #[test]
    fn footer_lists_only_filled_socials() {
        let html = home(&metadata(), &[], &[]).into_string();
        assert!(html.contains("https://instagram.com/lens"));
        assert!(!html.contains("Twitter"));
        assert!(html.contains("mailto:hello@example.com"));
        assert!(html.contains("Lens &amp; Light"));
    }

    #[test]
    fn unavailable_album_is_marked() {
        let albums = [
            AlbumImages {
                name: "wedding",
                hash: "RZVXrPP",
                images: None,
            },
            AlbumImages {
                name: "family",
                hash: "7AbOjou",
                images: Some(vec![image("f1")]),
            },
        ];
        let html = gallery(&metadata(), &albums).into_string();
        assert!(html.contains("temporarily unavailable"));
        assert!(html.contains("http://x/f1.jpg"));
    }

    #[test]
    fn gallery_edit_exposes_hashes_and_ids() {
        let albums = [AlbumImages {
            name: "event",
            hash: "ShX8W9o",
            images: Some(vec![image("e1")]),
        }];
        let html = gallery_edit(&metadata(), &albums, &[]).into_string();
        assert!(html.contains(r#"value="ShX8W9o""#));
        assert!(html.contains(r#"data-image-id="e1""#));
    }
}
