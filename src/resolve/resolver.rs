//! Depth-first resolution of external tilesets and object templates

use std::path::Path;

use super::context::ResolveContext;
use super::merge::{merge_template, merge_tileset};
use crate::document;
use crate::error::{Error, Result};
use crate::map::{Group, Map, Object, ObjectGroup, Template, TileDefinition, Tileset};

/// A referenced file with the wrong root element is malformed in its own
/// right; any other decode failure is wrapped with the file's path
fn reference_error(path: &Path, err: Error) -> Error {
    match err {
        Error::TemplateMalformed { reason } => {
            Error::template(format!("{}: {}", path.display(), reason))
        }
        other => Error::ReferenceParse {
            path: path.to_path_buf(),
            source: Box::new(other),
        },
    }
}

/// A node that owns, or contains nodes that own, references to other files
///
/// Implementations resolve their children first and their own reference
/// last, so a merge never sees an unresolved descendant. A reference that has
/// been merged is skipped on later passes.
pub trait Resolve {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()>;
}

impl<T: Resolve> Resolve for [T] {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.iter_mut().try_for_each(|node| node.resolve(ctx))
    }
}

impl<T: Resolve> Resolve for Vec<T> {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.as_mut_slice().resolve(ctx)
    }
}

impl<T: Resolve> Resolve for Option<T> {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        match self {
            Some(node) => node.resolve(ctx),
            None => Ok(()),
        }
    }
}

impl Resolve for Map {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.tilesets.resolve(ctx)?;
        self.object_groups.resolve(ctx)?;
        self.groups.resolve(ctx)
    }
}

impl Resolve for Group {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.object_groups.resolve(ctx)?;
        self.groups.resolve(ctx)
    }
}

impl Resolve for ObjectGroup {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.objects.resolve(ctx)
    }
}

impl Resolve for TileDefinition {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.object_group.resolve(ctx)
    }
}

impl Resolve for Template {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.tilesets.resolve(ctx)?;
        self.objects.resolve(ctx)
    }
}

impl Resolve for Tileset {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        self.tiles.resolve(ctx)?;

        let Some(source) = self.source.as_deref() else {
            return Ok(());
        };
        if self.is_resolved() {
            return Ok(());
        }

        let (path, text, nested) = ctx.load(source)?;
        let mut external =
            document::decode_tileset(&text).map_err(|e| reference_error(&path, e))?;
        external.resolve(&nested)?;

        log::debug!(
            "merging tileset '{}' from {} at firstgid {}",
            external.name,
            path.display(),
            self.first_gid
        );
        merge_tileset(self, external);
        Ok(())
    }
}

impl Resolve for Object {
    fn resolve(&mut self, ctx: &ResolveContext<'_>) -> Result<()> {
        let Some(template) = self.template.as_deref() else {
            return Ok(());
        };
        if self.is_resolved() {
            return Ok(());
        }

        let (path, text, nested) = ctx.load(template)?;
        let mut template =
            document::decode_template(&text).map_err(|e| reference_error(&path, e))?;
        template.resolve(&nested)?;

        log::debug!("merging template {} into object {}", path.display(), self.id);
        merge_template(self, template)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::config::ParseConfig;
    use crate::map::Shape;
    use crate::resolve::Source;

    /// In-memory files that record every read
    #[derive(Default)]
    struct Files {
        files: HashMap<PathBuf, String>,
        reads: RefCell<Vec<PathBuf>>,
    }

    impl Files {
        fn with(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }
    }

    impl Source for Files {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.borrow_mut().push(path.to_path_buf());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    fn map(xml: &str) -> Map {
        document::decode_map(xml).unwrap()
    }

    const TEMPLATE_MAP: &str = r#"<map width="1" height="1" tilewidth="16" tileheight="16">
 <objectgroup id="2" name="Object Layer 1">
  <object id="3" template="templates/ellipse.tx" x="26" y="5"/>
  <object id="7" template="templates/ellipse.tx" x="0" y="0"/>
 </objectgroup>
</map>"#;

    const ELLIPSE_TX: &str = r#"<template>
 <object width="15" height="40"><ellipse/></object>
</template>"#;

    #[test]
    fn test_each_reference_is_loaded_independently() {
        let files = Files::default().with("maps/templates/ellipse.tx", ELLIPSE_TX);
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("maps", &files, &config);

        let mut map = map(TEMPLATE_MAP);
        map.resolve(&ctx).unwrap();

        let objects = &map.object_groups[0].objects;
        assert_eq!(objects[0].width, Some(15.0));
        assert_eq!(objects[1].shape, Some(Shape::Ellipse));
        assert_eq!(files.reads.borrow().len(), 2);
    }

    #[test]
    fn test_second_pass_does_not_reload() {
        let files = Files::default().with("templates/ellipse.tx", ELLIPSE_TX);
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("", &files, &config);

        let mut map = map(TEMPLATE_MAP);
        map.resolve(&ctx).unwrap();
        map.resolve(&ctx).unwrap();
        assert_eq!(files.reads.borrow().len(), 2);
    }

    #[test]
    fn test_nested_references_resolve_against_their_own_directory() {
        let files = Files::default()
            .with(
                "maps/objects/cactus.tx",
                r#"<template>
                    <tileset firstgid="1" source="../tilesets/desert.tsx"/>
                    <object gid="30" width="32" height="32"/>
                </template>"#,
            )
            .with(
                "maps/objects/../tilesets/desert.tsx",
                r#"<tileset name="desert" tilewidth="32" tileheight="32" tilecount="48" columns="8">
                    <image source="tmw_desert_spacing.png" width="265" height="199"/>
                </tileset>"#,
            );
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("maps", &files, &config);

        let mut map = map(r#"<map width="1" height="1">
 <objectgroup name="Props"><object id="1" template="objects/cactus.tx" x="64" y="96"/></objectgroup>
</map>"#);
        map.resolve(&ctx).unwrap();

        let cactus = &map.object_groups[0].objects[0];
        assert_eq!(cactus.gid, Some(30));
        let tileset = cactus.tileset.as_ref().unwrap();
        assert_eq!(tileset.name, "desert");
        assert_eq!(tileset.first_gid, 1);
        assert!(tileset.is_resolved());
    }

    #[test]
    fn test_tileset_collision_objects_resolve_inside_external_tileset() {
        let files = Files::default()
            .with(
                "tiles/walls.tsx",
                r#"<tileset name="walls" tilecount="4">
                    <tile id="0">
                        <objectgroup><object id="1" template="box.tx"/></objectgroup>
                    </tile>
                </tileset>"#,
            )
            .with(
                "tiles/box.tx",
                r#"<template><object width="16" height="16"/></template>"#,
            );
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("", &files, &config);

        let mut map = map(r#"<map width="1" height="1"><tileset firstgid="5" source="tiles/walls.tsx"/></map>"#);
        map.resolve(&ctx).unwrap();

        let tileset = &map.tilesets[0];
        assert_eq!(tileset.first_gid, 5);
        let collision = tileset.tile(0).unwrap().object_group.as_ref().unwrap();
        assert_eq!(collision.objects[0].width, Some(16.0));
    }

    #[test]
    fn test_missing_template() {
        let files = Files::default();
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("", &files, &config);

        let mut map = map(TEMPLATE_MAP);
        let err = map.resolve(&ctx).unwrap_err();
        assert!(matches!(err, Error::ReferenceNotFound { .. }));
        // fail-fast: the second object is never attempted
        assert_eq!(files.reads.borrow().len(), 1);
    }

    #[test]
    fn test_undecodable_tileset_is_reference_parse_error() {
        let files = Files::default().with("bad.tsx", r#"<tileset tilewidth="sixteen"/>"#);
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("", &files, &config);

        let mut map = map(r#"<map><tileset firstgid="1" source="bad.tsx"/></map>"#);
        let err = map.resolve(&ctx).unwrap_err();
        match err {
            Error::ReferenceParse { path, source } => {
                assert_eq!(path, PathBuf::from("bad.tsx"));
                assert!(matches!(*source, Error::Decode(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_root_names_the_referenced_file() {
        let files = Files::default()
            .with("level.tsx", r#"<map width="1" height="1"/>"#)
            .with("crate.tx", r#"<tileset name="crates"/>"#);
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("", &files, &config);

        let mut tileset_map = map(r#"<map><tileset firstgid="1" source="level.tsx"/></map>"#);
        match tileset_map.resolve(&ctx).unwrap_err() {
            Error::TemplateMalformed { reason } => {
                assert!(reason.starts_with("level.tsx: "), "{reason}");
                assert!(reason.contains("<map>"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut object_map =
            map(r#"<map><objectgroup><object id="1" template="crate.tx"/></objectgroup></map>"#);
        match object_map.resolve(&ctx).unwrap_err() {
            Error::TemplateMalformed { reason } => {
                assert!(reason.starts_with("crate.tx: "), "{reason}");
                assert!(reason.contains("<tileset>"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_referencing_template_is_circular() {
        let files = Files::default().with(
            "loop.tx",
            r#"<template><object template="loop.tx"/></template>"#,
        );
        let config = ParseConfig::default();
        let ctx = ResolveContext::new("", &files, &config);

        let mut map = map(r#"<map><objectgroup><object id="1" template="loop.tx"/></objectgroup></map>"#);
        let err = map.resolve(&ctx).unwrap_err();
        assert!(matches!(err, Error::CircularReference { .. }));
    }
}
