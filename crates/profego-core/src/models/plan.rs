//! Lesson-plan data as returned by the `/plans` endpoints.
//!
//! Two generations of the AI pipeline produced two module shapes: current
//! plans structure each module around inicio/desarrollo/cierre activities,
//! while older plans used a flat tema/objetivo layout. `PlanModule` keeps
//! both shapes as explicit variants, discriminated by the presence of the
//! `actividad_inicio` marker field, so the view layer can select rendering
//! per variant instead of probing optional fields.

use serde::{Deserialize, Serialize};

/// One row of `/plans/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub plan_id: String,
    pub nombre_plan: String,
    #[serde(default)]
    pub fecha_generacion: Option<String>,
    #[serde(default)]
    pub num_modulos: u32,
    #[serde(default)]
    pub tiene_diagnostico: bool,
    #[serde(default)]
    pub grado: Option<String>,
    #[serde(default)]
    pub campo_formativo_principal: Option<String>,
    #[serde(default)]
    pub campo_formativo: Option<String>,
    #[serde(default)]
    pub materia: Option<String>,
}

impl PlanSummary {
    /// Preferred subject label: newer plans carry
    /// `campo_formativo_principal`, older ones `campo_formativo` or
    /// `materia`.
    pub fn campo_formativo_display(&self) -> Option<&str> {
        self.campo_formativo_principal
            .as_deref()
            .or(self.campo_formativo.as_deref())
            .or(self.materia.as_deref())
    }
}

/// Envelope for `/plans/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanListResponse {
    pub success: bool,
    #[serde(default)]
    pub planes: Vec<PlanSummary>,
}

/// Envelope for `/plans/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDetailResponse {
    pub success: bool,
    #[serde(default)]
    pub plan: Option<PlanDetail>,
}

/// Envelope for `/plans/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    pub success: bool,
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub plan_data: Option<PlanData>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub processing_time: Option<f64>,
}

/// Metadata of a freshly generated plan. The generator attaches the full
/// plan body too; anything beyond the identity fields stays loose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanData {
    #[serde(default)]
    pub plan_id: Option<String>,
    pub nombre_plan: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Full plan detail from `/plans/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDetail {
    pub nombre_plan: String,
    #[serde(default)]
    pub fecha_generacion: Option<String>,
    #[serde(default)]
    pub num_modulos: u32,
    #[serde(default)]
    pub tiene_diagnostico: bool,
    #[serde(default)]
    pub grado: Option<String>,
    #[serde(default)]
    pub campo_formativo_principal: Option<String>,
    #[serde(default)]
    pub materia: Option<String>,
    #[serde(default)]
    pub edad_aprox: Option<String>,
    #[serde(default)]
    pub duracion_total: Option<String>,
    #[serde(default)]
    pub generado_con: Option<String>,
    #[serde(default)]
    pub ejes_articuladores_generales: Vec<String>,
    #[serde(default)]
    pub modulos: Vec<PlanModule>,
    #[serde(default)]
    pub recursos_educativos: Option<RecursosEducativos>,
    #[serde(default)]
    pub recomendaciones_ambiente: Option<String>,
    #[serde(default)]
    pub vinculacion_curricular: Option<VinculacionCurricular>,
}

/// A plan module in either pipeline generation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PlanModule {
    Current(CurrentPlanModule),
    Legacy(LegacyPlanModule),
}

impl PlanModule {
    pub fn numero(&self) -> u32 {
        match self {
            PlanModule::Current(m) => m.numero,
            PlanModule::Legacy(m) => m.numero,
        }
    }

    pub fn nombre(&self) -> &str {
        match self {
            PlanModule::Current(m) => &m.nombre,
            PlanModule::Legacy(m) => &m.nombre,
        }
    }
}

// The discriminant is the presence of the `actividad_inicio` key (an
// explicit null still selects the current shape, matching how the plans
// were written).
impl<'de> Deserialize<'de> for PlanModule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("actividad_inicio").is_some() {
            serde_json::from_value(value)
                .map(PlanModule::Current)
                .map_err(serde::de::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(PlanModule::Legacy)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// Module shape produced by the current pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentPlanModule {
    #[serde(default)]
    pub numero: u32,
    pub nombre: String,
    #[serde(default)]
    pub campo_formativo: Option<String>,
    #[serde(default)]
    pub ejes_articuladores: Vec<String>,
    #[serde(default)]
    pub aprendizaje_esperado: Option<String>,
    #[serde(default)]
    pub tiempo_estimado: Option<String>,
    #[serde(default)]
    pub actividad_inicio: Option<Actividad>,
    #[serde(default)]
    pub actividades_desarrollo: Vec<ActividadDesarrollo>,
    #[serde(default)]
    pub actividad_cierre: Option<ActividadCierre>,
    #[serde(default)]
    pub consejos_maestra: Option<String>,
    #[serde(default)]
    pub variaciones: Option<String>,
    #[serde(default)]
    pub vinculo_familia: Option<String>,
    #[serde(default)]
    pub evaluacion: Option<String>,
}

/// Module shape produced by the first pipeline generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyPlanModule {
    #[serde(default)]
    pub numero: u32,
    pub nombre: String,
    #[serde(default)]
    pub tema: Option<String>,
    #[serde(default)]
    pub objetivo: Option<String>,
    #[serde(default)]
    pub planteamiento: Option<String>,
    #[serde(default)]
    pub materiales: Option<String>,
    #[serde(default)]
    pub tiempo: Option<String>,
    #[serde(default)]
    pub participacion: Option<String>,
    #[serde(default)]
    pub ejes_articulares: Option<String>,
}

/// Opening activity of a current-shape module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actividad {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub duracion: String,
    #[serde(default)]
    pub materiales: Option<Materiales>,
    #[serde(default)]
    pub organizacion: Option<String>,
}

/// One of the development activities of a current-shape module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActividadDesarrollo {
    pub nombre: String,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub duracion: Option<String>,
    #[serde(default)]
    pub organizacion: Option<String>,
    #[serde(default)]
    pub materiales: Option<Materiales>,
    #[serde(default)]
    pub aspectos_a_observar: Option<String>,
}

/// Closing activity of a current-shape module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActividadCierre {
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub duracion: String,
    #[serde(default)]
    pub preguntas_guia: Vec<String>,
}

/// `materiales` arrives as either a single string or a list, depending on
/// the generator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Materiales {
    Lista(Vec<String>),
    Texto(String),
}

impl Materiales {
    /// Flatten to a display string, comma-separating list entries.
    pub fn join(&self) -> String {
        match self {
            Materiales::Lista(items) => items.join(", "),
            Materiales::Texto(text) => text.clone(),
        }
    }
}

/// Educational resources attached to current-generation plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecursosEducativos {
    #[serde(default)]
    pub materiales_generales: Vec<String>,
    #[serde(default)]
    pub cuentos_recomendados: Vec<Cuento>,
    #[serde(default)]
    pub canciones_recomendadas: Vec<Cancion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cuento {
    pub titulo: String,
    #[serde(default)]
    pub autor: Option<String>,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub acceso: Option<String>,
    #[serde(default)]
    pub disponibilidad: Option<String>,
    #[serde(default)]
    pub descripcion_breve: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cancion {
    pub titulo: String,
    #[serde(default)]
    pub tipo: Option<String>,
    #[serde(default)]
    pub acceso: Option<String>,
    #[serde(default)]
    pub disponibilidad: Option<String>,
    #[serde(default)]
    pub uso_sugerido: Option<String>,
}

/// Curricular linkage section of current-generation plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VinculacionCurricular {
    #[serde(default)]
    pub campo_formativo_principal: Option<String>,
    #[serde(default)]
    pub campos_secundarios: Vec<String>,
    #[serde(default)]
    pub ejes_transversales: Vec<String>,
    #[serde(default)]
    pub aprendizajes_clave: Vec<String>,
}

/// A plan exported as a Word document.
#[derive(Debug, Clone)]
pub struct PlanDocument {
    /// Derived from Content-Disposition, or the default export name.
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_module_is_selected_by_marker_field() {
        let json = r#"{
            "numero": 1,
            "nombre": "Los seres vivos",
            "campo_formativo": "Exploración del mundo natural",
            "ejes_articuladores": ["Inclusión", "Pensamiento crítico"],
            "aprendizaje_esperado": "Identifica seres vivos de su entorno",
            "tiempo_estimado": "2 semanas",
            "actividad_inicio": {
                "nombre": "El safari del patio",
                "descripcion": "Recorrido de observación",
                "duracion": "20 minutos",
                "materiales": ["lupa", "libreta"],
                "organizacion": "equipos de 4"
            },
            "actividades_desarrollo": [{
                "nombre": "Clasificamos hallazgos",
                "tipo": "exploración",
                "descripcion": "Separar lo vivo de lo no vivo",
                "materiales": "tarjetas ilustradas"
            }],
            "actividad_cierre": {
                "nombre": "Círculo de hallazgos",
                "descripcion": "Compartir lo observado",
                "duracion": "15 minutos",
                "preguntas_guia": ["¿Qué encontraste?", "¿Cómo sabes que está vivo?"]
            }
        }"#;

        let module: PlanModule = serde_json::from_str(json).unwrap();
        let PlanModule::Current(m) = module else {
            panic!("expected current-shape module");
        };
        assert_eq!(m.numero, 1);
        let inicio = m.actividad_inicio.unwrap();
        assert_eq!(inicio.materiales.unwrap().join(), "lupa, libreta");
        assert_eq!(
            m.actividades_desarrollo[0].materiales.as_ref().unwrap().join(),
            "tarjetas ilustradas"
        );
        assert_eq!(m.actividad_cierre.unwrap().preguntas_guia.len(), 2);
    }

    #[test]
    fn legacy_module_parses_without_marker_field() {
        let json = r#"{
            "numero": 3,
            "nombre": "Figuras geométricas",
            "tema": "Formas en mi entorno",
            "objetivo": "Reconocer figuras básicas",
            "planteamiento": "Buscar figuras en el aula",
            "materiales": "bloques, hojas, crayones",
            "tiempo": "45 minutos",
            "participacion": "grupal",
            "ejes_articulares": "Pensamiento matemático"
        }"#;

        let module: PlanModule = serde_json::from_str(json).unwrap();
        let PlanModule::Legacy(m) = module else {
            panic!("expected legacy-shape module");
        };
        assert_eq!(m.nombre, "Figuras geométricas");
        assert_eq!(m.tema.as_deref(), Some("Formas en mi entorno"));
        assert_eq!(module_accessors(&PlanModule::Legacy(m)), (3, true));
    }

    fn module_accessors(module: &PlanModule) -> (u32, bool) {
        (module.numero(), !module.nombre().is_empty())
    }

    #[test]
    fn null_marker_still_selects_current_shape() {
        let json = r#"{"numero": 2, "nombre": "Módulo", "actividad_inicio": null}"#;
        let module: PlanModule = serde_json::from_str(json).unwrap();
        assert!(matches!(module, PlanModule::Current(_)));
    }

    #[test]
    fn plan_list_envelope_parses() {
        let json = r#"{
            "success": true,
            "planes": [{
                "plan_id": "abc123",
                "nombre_plan": "Plan de primavera",
                "fecha_generacion": "2025-04-01T10:00:00",
                "num_modulos": 4,
                "tiene_diagnostico": true,
                "grado": "2do preescolar",
                "campo_formativo": "Lenguajes"
            }]
        }"#;
        let response: PlanListResponse = serde_json::from_str(json).unwrap();
        assert!(response.success);
        assert_eq!(response.planes.len(), 1);
        assert_eq!(
            response.planes[0].campo_formativo_display(),
            Some("Lenguajes")
        );
    }
}
