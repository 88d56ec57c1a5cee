//! platform::container
//!
//! Resource holder artifacts, written once per platform pass after every
//! kind generator has run.
//!
//! - Apple: `Info.plist` identifying the resource bundle
//! - JVM: `<Class>.holder.json`, naming the bundles and objects accessor
//!   code loads at runtime
//!
//! Other platforms have no holder artifact and use the no-op generator.

use std::path::PathBuf;

use serde::Serialize;

use super::jvm::bundle_name;
use super::{escape_xml, write_file, ContainerGenerator, GenerateError};
use crate::core::metadata::{ObjectKind, ObjectMetadata, ResourceType, Visibility};
use crate::core::types::{ClassName, LocaleTag, PackageName};

/// Writes the `Info.plist` of the Apple resource bundle.
#[derive(Debug, Clone)]
pub struct AppleContainerGenerator {
    bundle_identifier: String,
    class_name: ClassName,
    base_region: LocaleTag,
    sources_dir: PathBuf,
}

impl AppleContainerGenerator {
    pub fn new(
        bundle_identifier: String,
        class_name: ClassName,
        base_region: LocaleTag,
        sources_dir: PathBuf,
    ) -> Self {
        Self {
            bundle_identifier,
            class_name,
            base_region,
            sources_dir,
        }
    }
}

impl ContainerGenerator for AppleContainerGenerator {
    fn generate(&self, _objects: &[&ObjectMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let entries = [
            ("CFBundleDevelopmentRegion", self.base_region.as_str()),
            ("CFBundleIdentifier", self.bundle_identifier.as_str()),
            ("CFBundleName", self.class_name.as_str()),
            ("CFBundlePackageType", "BNDL"),
        ];

        let mut body = String::new();
        for (key, value) in entries {
            body.push_str(&format!(
                "    <key>{key}</key>\n    <string>{}</string>\n",
                escape_xml(value)
            ));
        }
        let plist = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <!DOCTYPE plist PUBLIC \"-//Apple//DTD PLIST 1.0//EN\" \
             \"http://www.apple.com/DTDs/PropertyList-1.0.dtd\">\n\
             <plist version=\"1.0\">\n<dict>\n{body}</dict>\n</plist>\n"
        );

        Ok(vec![write_file(&self.sources_dir.join("Info.plist"), &plist)?])
    }
}

/// Writes the JVM holder descriptor.
#[derive(Debug, Clone)]
pub struct JvmContainerGenerator {
    package: PackageName,
    class_name: ClassName,
    sources_dir: PathBuf,
}

impl JvmContainerGenerator {
    pub fn new(package: PackageName, class_name: ClassName, sources_dir: PathBuf) -> Self {
        Self {
            package,
            class_name,
            sources_dir,
        }
    }
}

#[derive(Debug, Serialize)]
struct HolderDescriptor<'a> {
    package: &'a str,
    class_name: &'a str,
    strings_bundle: String,
    plurals_bundle: String,
    images_dir: &'static str,
    objects: Vec<HolderObject<'a>>,
}

#[derive(Debug, Serialize)]
struct HolderObject<'a> {
    name: &'a str,
    resource_type: ResourceType,
    kind: ObjectKind,
    visibility: Visibility,
    keys: Vec<&'a str>,
}

impl ContainerGenerator for JvmContainerGenerator {
    fn generate(&self, objects: &[&ObjectMetadata]) -> Result<Vec<PathBuf>, GenerateError> {
        let descriptor = HolderDescriptor {
            package: self.package.as_str(),
            class_name: self.class_name.as_str(),
            strings_bundle: bundle_name(&self.package, &self.class_name, ResourceType::Strings),
            plurals_bundle: bundle_name(&self.package, &self.class_name, ResourceType::Plurals),
            images_dir: "images",
            objects: objects
                .iter()
                .map(|object| HolderObject {
                    name: &object.name,
                    resource_type: object.resource_type,
                    kind: object.kind,
                    visibility: object.visibility,
                    keys: object.values.iter().map(|value| value.key().as_str()).collect(),
                })
                .collect(),
        };

        let path = self
            .sources_dir
            .join(format!("{}.holder.json", self.class_name));
        let mut json =
            serde_json::to_string_pretty(&descriptor).map_err(|e| GenerateError::Encode {
                path: path.clone(),
                message: e.to_string(),
            })?;
        json.push('\n');
        Ok(vec![write_file(&path, &json)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::{ResourceMetadata, StringMetadata};
    use crate::core::types::ResourceKey;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn apple_info_plist() {
        let temp = TempDir::new().unwrap();
        let generator = AppleContainerGenerator::new(
            "com.example.MR".to_string(),
            ClassName::default(),
            LocaleTag::new("en").unwrap(),
            temp.path().to_path_buf(),
        );

        let written = generator.generate(&[]).unwrap();

        let plist = fs::read_to_string(&written[0]).unwrap();
        assert!(plist.contains(
            "<key>CFBundleIdentifier</key>\n    <string>com.example.MR</string>"
        ));
        assert!(plist.contains("<string>BNDL</string>"));
        assert!(plist.contains("<string>en</string>"));
    }

    #[test]
    fn jvm_holder_lists_objects() {
        let temp = TempDir::new().unwrap();
        let generator = JvmContainerGenerator::new(
            PackageName::new("com.example").unwrap(),
            ClassName::default(),
            temp.path().to_path_buf(),
        );
        let object = ObjectMetadata {
            name: "com.example.MR.strings".into(),
            resource_type: ResourceType::Strings,
            kind: ObjectKind::Actual,
            visibility: Visibility::Internal,
            values: vec![ResourceMetadata::String(StringMetadata::new(
                ResourceKey::new("greeting").unwrap(),
            ))],
            nested: Vec::new(),
        };

        generator.generate(&[&object]).unwrap();

        let json: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(temp.path().join("MR.holder.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["strings_bundle"], "localization/comexample_MR_strings");
        assert_eq!(json["objects"][0]["kind"], "actual");
        assert_eq!(json["objects"][0]["visibility"], "internal");
        assert_eq!(json["objects"][0]["keys"][0], "greeting");
    }
}
