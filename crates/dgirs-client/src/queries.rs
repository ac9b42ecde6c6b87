//! Fixed GraphQL documents issued against DGIdb.
//!
//! Every document takes `$names` plus optional filters; variables that are
//! not bound are sent as absent and ignored by the server.

pub const GET_DRUGS: &str = r#"
query getDrugs($names: [String!], $immunotherapy: Boolean, $antiNeoplastic: Boolean) {
  drugs(names: $names, immunotherapy: $immunotherapy, antiNeoplastic: $antiNeoplastic) {
    nodes {
      name
      conceptId
      drugAliases { alias }
      drugAttributes { name value }
      antiNeoplastic
      immunotherapy
      approved
      drugApprovalRatings {
        rating
        source { sourceDbName }
      }
      drugApplications { appNo }
    }
  }
}
"#;

pub const GET_GENES: &str = r#"
query getGenes($names: [String!]) {
  genes(names: $names) {
    nodes {
      name
      longName
      conceptId
      geneAliases { alias }
      geneAttributes { name value }
    }
  }
}
"#;

pub const GET_INTERACTIONS_BY_GENE: &str = r#"
query getInteractionsByGene(
  $names: [String!]
  $sourceDbName: String
  $pmid: Int
  $interactionType: String
  $approved: Boolean
  $immunotherapy: Boolean
  $antiNeoplastic: Boolean
) {
  genes(names: $names) {
    nodes {
      name
      longName
      interactions(
        sourceDbName: $sourceDbName
        pmid: $pmid
        interactionType: $interactionType
        approved: $approved
        immunotherapy: $immunotherapy
        antiNeoplastic: $antiNeoplastic
      ) {
        interactionAttributes { name value }
        drug { name approved }
        interactionScore
        interactionClaims {
          publications { pmid }
          source { sourceDbName }
        }
      }
    }
  }
}
"#;

pub const GET_INTERACTIONS_BY_DRUG: &str = r#"
query getInteractionsByDrug(
  $names: [String!]
  $sourceDbName: String
  $pmid: Int
  $interactionType: String
  $approved: Boolean
  $immunotherapy: Boolean
  $antiNeoplastic: Boolean
) {
  drugs(names: $names, approved: $approved, immunotherapy: $immunotherapy, antiNeoplastic: $antiNeoplastic) {
    nodes {
      name
      approved
      interactions(sourceDbName: $sourceDbName, pmid: $pmid, interactionType: $interactionType) {
        gene { name longName }
        interactionAttributes { name value }
        interactionScore
        interactionClaims {
          publications { pmid }
          source { sourceDbName }
        }
      }
    }
  }
}
"#;

pub const GET_GENE_CATEGORIES: &str = r#"
query getGeneCategories($names: [String!]) {
  genes(names: $names) {
    nodes {
      name
      longName
      geneCategoriesWithSources {
        name
        sourceNames
      }
    }
  }
}
"#;

pub const GET_SOURCES: &str = r#"
query getSources($sourceType: SourceTypeFilter) {
  sources(sourceType: $sourceType) {
    nodes {
      fullName
      sourceDbName
      sourceDbVersion
      drugClaimsCount
      geneClaimsCount
      interactionClaimsCount
    }
  }
}
"#;

pub const GET_ALL_GENES: &str = r#"
query getAllGenes {
  genes {
    nodes {
      name
      conceptId
    }
  }
}
"#;

pub const GET_ALL_DRUGS: &str = r#"
query getAllDrugs {
  drugs {
    nodes {
      name
      conceptId
    }
  }
}
"#;

pub const GET_DRUG_APPLICATIONS: &str = r#"
query getDrugApplications($names: [String!]) {
  drugs(names: $names) {
    nodes {
      name
      drugApplications { appNo }
    }
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_name_their_operations() {
        for (doc, op) in [
            (GET_DRUGS, "getDrugs"),
            (GET_GENES, "getGenes"),
            (GET_INTERACTIONS_BY_GENE, "getInteractionsByGene"),
            (GET_INTERACTIONS_BY_DRUG, "getInteractionsByDrug"),
            (GET_GENE_CATEGORIES, "getGeneCategories"),
            (GET_SOURCES, "getSources"),
            (GET_ALL_GENES, "getAllGenes"),
            (GET_ALL_DRUGS, "getAllDrugs"),
            (GET_DRUG_APPLICATIONS, "getDrugApplications"),
        ] {
            assert!(doc.contains(&format!("query {}", op)), "{} missing", op);
            assert_eq!(doc.matches('{').count(), doc.matches('}').count(), "{} unbalanced", op);
        }
    }

    #[test]
    fn test_interaction_documents_bind_all_filters() {
        for doc in [GET_INTERACTIONS_BY_GENE, GET_INTERACTIONS_BY_DRUG] {
            for var in ["$sourceDbName", "$pmid", "$interactionType", "$approved", "$immunotherapy", "$antiNeoplastic"] {
                assert!(doc.contains(var), "missing {}", var);
            }
        }
    }
}
