//! DAV XML response bodies.

use calshare_core::types::{Ace, SearchHit};

const XML_DECL: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Multistatus listing the hits of a calendar search.
pub fn build_search_multistatus(dav_ns: &str, hits: &[SearchHit]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<D:multistatus xmlns:D=\"{}\">\n", xml_escape(dav_ns)));

    for hit in hits {
        xml.push_str("  <D:response>\n");
        xml.push_str(&format!("    <D:href>{}</D:href>\n", xml_escape(&hit.href)));
        xml.push_str("    <D:propstat>\n");
        xml.push_str("      <D:prop>\n");
        xml.push_str(&format!(
            "        <D:getetag>\"{}\"</D:getetag>\n",
            xml_escape(&hit.etag)
        ));
        xml.push_str("      </D:prop>\n");
        xml.push_str("      <D:status>HTTP/1.1 200 OK</D:status>\n");
        xml.push_str("    </D:propstat>\n");
        xml.push_str("  </D:response>\n");
    }

    xml.push_str("</D:multistatus>\n");
    xml
}

/// Multistatus carrying the `{DAV:}acl` property of one resource.
pub fn build_acl_multistatus(dav_ns: &str, href: &str, aces: &[Ace]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<D:multistatus xmlns:D=\"{}\">\n", xml_escape(dav_ns)));
    xml.push_str("  <D:response>\n");
    xml.push_str(&format!("    <D:href>{}</D:href>\n", xml_escape(href)));
    xml.push_str("    <D:propstat>\n");
    xml.push_str("      <D:prop>\n");
    xml.push_str("        <D:acl>\n");

    for ace in aces {
        xml.push_str("          <D:ace>\n");
        xml.push_str(&format!(
            "            <D:principal><D:href>/{}/</D:href></D:principal>\n",
            xml_escape(ace.principal.trim_matches('/'))
        ));
        xml.push_str(&format!(
            "            <D:grant><D:privilege><D:{}/></D:privilege></D:grant>\n",
            ace.privilege.local_name()
        ));
        if ace.protected {
            xml.push_str("            <D:protected/>\n");
        }
        xml.push_str("          </D:ace>\n");
    }

    xml.push_str("        </D:acl>\n");
    xml.push_str("      </D:prop>\n");
    xml.push_str("      <D:status>HTTP/1.1 200 OK</D:status>\n");
    xml.push_str("    </D:propstat>\n");
    xml.push_str("  </D:response>\n");
    xml.push_str("</D:multistatus>\n");
    xml
}

/// `{DAV:}error` body with one condition element and a description.
pub fn build_error_xml(dav_ns: &str, condition: &str, description: &str) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!("<D:error xmlns:D=\"{}\">\n", xml_escape(dav_ns)));
    xml.push_str(&format!("  <D:{}/>\n", xml_escape(condition)));
    xml.push_str(&format!(
        "  <D:responsedescription>{}</D:responsedescription>\n",
        xml_escape(description)
    ));
    xml.push_str("</D:error>\n");
    xml
}

/// Escape XML special characters.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
