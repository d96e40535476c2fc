//! Merge policies for loaded references

use crate::error::{Error, Result};
use crate::map::{Object, Template, Tileset};

/// Merge a resolved template into an object instance
///
/// Values the instance sets always win. Identity and position (`id`, `name`,
/// `x`, `y`) are never taken from the template. Template properties are
/// appended unless the instance defines a property of the same name.
pub fn merge_template(instance: &mut Object, template: Template) -> Result<()> {
    let Template {
        mut tilesets,
        mut objects,
    } = template;

    if objects.len() != 1 {
        return Err(Error::template(format!(
            "expected exactly one <object>, found {}",
            objects.len()
        )));
    }
    if tilesets.len() > 1 {
        return Err(Error::template(format!(
            "expected at most one <tileset>, found {}",
            tilesets.len()
        )));
    }
    let proto = objects.remove(0);

    instance.kind = instance.kind.take().or(proto.kind);
    instance.width = instance.width.or(proto.width);
    instance.height = instance.height.or(proto.height);
    instance.rotation = instance.rotation.or(proto.rotation);
    instance.gid = instance.gid.or(proto.gid);
    instance.visible = instance.visible.or(proto.visible);
    instance.text = instance.text.take().or(proto.text);
    instance.shape = instance.shape.take().or(proto.shape);

    for property in proto.properties {
        if instance.property(&property.name).is_none() {
            instance.properties.push(property);
        }
    }

    instance.tileset = tilesets.pop().map(Box::new).or(proto.tileset);
    instance.template_resolved = true;
    Ok(())
}

/// Replace a tileset placeholder's body with its external definition
///
/// `first_gid` is local to the referencing map and `source` records where
/// the content came from, so both are kept.
pub fn merge_tileset(placeholder: &mut Tileset, external: Tileset) {
    let first_gid = placeholder.first_gid;
    let source = placeholder.source.take();
    *placeholder = Tileset {
        first_gid,
        source,
        source_resolved: true,
        ..external
    };
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::map::{Property, Shape};

    fn object(xml: &str) -> Object {
        let mut object: Object = quick_xml::de::from_str(xml).unwrap();
        object.finalize().unwrap();
        object
    }

    fn template(xml: &str) -> Template {
        crate::document::decode_template(xml).unwrap()
    }

    #[test]
    fn test_instance_inherits_unset_fields() {
        let mut instance = object(r#"<object id="3" template="ellipse.tx" x="26" y="5"/>"#);
        let tpl = template(
            r#"<template>
                <object name="Tpl" type="spawn" x="99" y="99" width="15" height="40">
                    <ellipse/>
                </object>
            </template>"#,
        );
        merge_template(&mut instance, tpl).unwrap();

        assert_eq!(instance.id, 3);
        assert_eq!(instance.name, "");
        assert_eq!((instance.x, instance.y), (26.0, 5.0));
        assert_eq!(instance.width, Some(15.0));
        assert_eq!(instance.height, Some(40.0));
        assert_eq!(instance.kind.as_deref(), Some("spawn"));
        assert_eq!(instance.shape, Some(Shape::Ellipse));
        assert!(instance.is_resolved());
    }

    #[test]
    fn test_instance_values_win() {
        let mut instance = object(
            r#"<object id="7" name="Mine" template="t.tx" width="0" rotation="90">
                <properties><property name="hp" value="5"/></properties>
                <point/>
            </object>"#,
        );
        let tpl = template(
            r#"<template>
                <object name="Tpl" width="15" height="40" rotation="0">
                    <properties>
                        <property name="hp" value="10"/>
                        <property name="team" value="red"/>
                    </properties>
                    <ellipse/>
                </object>
            </template>"#,
        );
        merge_template(&mut instance, tpl).unwrap();

        assert_eq!(instance.name, "Mine");
        assert_eq!(instance.width, Some(0.0));
        assert_eq!(instance.height, Some(40.0));
        assert_eq!(instance.rotation, Some(90.0));
        assert_eq!(instance.shape, Some(Shape::Point));
        assert_eq!(
            instance.properties,
            vec![Property::new("hp", "5"), Property::new("team", "red")]
        );
    }

    #[test]
    fn test_template_tileset_is_carried() {
        let mut instance = object(r#"<object id="1" template="cactus.tx"/>"#);
        let tpl = template(
            r#"<template>
                <tileset firstgid="1" source="desert.tsx"/>
                <object gid="30" width="32" height="32"/>
            </template>"#,
        );
        merge_template(&mut instance, tpl).unwrap();
        assert_eq!(instance.gid, Some(30));
        assert_eq!(
            instance.tileset.as_ref().and_then(|t| t.source.as_deref()),
            Some("desert.tsx")
        );
    }

    #[test]
    fn test_template_with_two_objects_is_malformed() {
        let mut instance = object(r#"<object id="1" template="two.tx"/>"#);
        let tpl = template(r#"<template><object id="1"/><object id="2"/></template>"#);
        let err = merge_template(&mut instance, tpl).unwrap_err();
        assert!(matches!(err, Error::TemplateMalformed { .. }));
        assert!(!instance.is_resolved());
    }

    #[test]
    fn test_template_without_object_is_malformed() {
        let mut instance = object(r#"<object id="1" template="none.tx"/>"#);
        let tpl = template(r#"<template/>"#);
        assert!(matches!(
            merge_template(&mut instance, tpl),
            Err(Error::TemplateMalformed { .. })
        ));
    }

    #[test]
    fn test_merge_tileset_keeps_first_gid_and_source() {
        let mut placeholder: Tileset =
            quick_xml::de::from_str(r#"<tileset firstgid="487" source="holiday.tsx"/>"#).unwrap();
        let external: Tileset = quick_xml::de::from_str(
            r#"<tileset firstgid="1" name="holiday" tilewidth="16" tileheight="16" tilecount="20">
                <image source="roguelikeHoliday_transparent.png"/>
            </tileset>"#,
        )
        .unwrap();

        merge_tileset(&mut placeholder, external);

        assert_eq!(placeholder.first_gid, 487);
        assert_eq!(placeholder.source.as_deref(), Some("holiday.tsx"));
        assert_eq!(placeholder.name, "holiday");
        assert_eq!(
            placeholder.image.as_ref().map(|i| i.source.as_str()),
            Some("roguelikeHoliday_transparent.png")
        );
        assert!(placeholder.is_resolved());
        assert!(placeholder.contains_gid(500));
    }
}
