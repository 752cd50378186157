//! Built-in character profiles and their word lists
//!
//! Each profile carries five role lists and a few sentence templates. The
//! word-catcher mode draws from these; the star mode only uses the profile
//! label for the HUD.

use serde::{Deserialize, Serialize};

/// Grammatical role of a falling word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Subject,
    Verb,
    Object,
    Place,
    Tone,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::Subject, Role::Verb, Role::Object, Role::Place, Role::Tone];

    /// HUD label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Subject => "Sujeto",
            Role::Verb => "Acción",
            Role::Object => "Cosa",
            Role::Place => "Lugar",
            Role::Tone => "Tono",
        }
    }

    /// Objects and tones carry the most narrative flavour and are highlighted
    pub fn is_important(&self) -> bool {
        matches!(self, Role::Object | Role::Tone)
    }

    pub fn index(&self) -> usize {
        match self {
            Role::Subject => 0,
            Role::Verb => 1,
            Role::Object => 2,
            Role::Place => 3,
            Role::Tone => 4,
        }
    }
}

/// A selectable character with its word bank
#[derive(Debug)]
pub struct Profile {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub prompt: &'static str,
    pub subjects: &'static [&'static str],
    pub verbs: &'static [&'static str],
    pub objects: &'static [&'static str],
    pub places: &'static [&'static str],
    pub tones: &'static [&'static str],
    pub templates: &'static [[Role; 5]],
}

impl Profile {
    pub fn words(&self, role: Role) -> &'static [&'static str] {
        match role {
            Role::Subject => self.subjects,
            Role::Verb => self.verbs,
            Role::Object => self.objects,
            Role::Place => self.places,
            Role::Tone => self.tones,
        }
    }
}

/// Look up a profile by id (case-insensitive)
pub fn profile(id: &str) -> Option<&'static Profile> {
    PROFILES.iter().find(|p| p.id.eq_ignore_ascii_case(id.trim()))
}

use Role::{Object as O, Place as L, Subject as S, Tone as T, Verb as V};

pub static PROFILES: [Profile; 4] = [
    Profile {
        id: "ciela",
        label: "Ciela",
        description: "La sabia",
        prompt: "Arma tu historia en 30 segundos. Ciela te guía con ideas claras y pistas.",
        subjects: &[
            "Ciela", "una maestra", "una bibliotecaria", "un libro antiguo", "una pregunta",
            "un mapa", "un farol", "una brújula", "un cuaderno", "una voz", "un mensaje",
            "una regla secreta", "un consejo", "una señal", "una carta", "una llave", "un espejo",
            "una historia", "un silencio atento", "un reloj",
        ],
        verbs: &[
            "explica", "ordena", "descifra", "observa", "elige", "recuerda", "anota", "conecta",
            "aclara", "resuelve", "enseña", "compara", "descubre", "pregunta", "comprende",
            "señala", "revela", "traza", "lee", "guía",
        ],
        objects: &[
            "una pista", "una idea", "una verdad", "una regla", "una respuesta", "una dirección",
            "un plan", "una palabra justa", "un secreto", "una solución", "un camino",
            "una señal brillante", "un mensaje corto", "una nota", "una historia nueva", "un paso",
            "un dibujo", "una promesa", "una memoria", "un detalle",
        ],
        places: &[
            "en la biblioteca", "en el bosque", "bajo la luna", "junto al río",
            "en un aula secreta", "en la cima de una colina", "entre hojas doradas",
            "en un pasillo silencioso", "al pie de un árbol", "detrás de una puerta", "en un claro",
            "sobre un puente", "en un rincón tibio", "en una plaza vacía",
        ],
        tones: &[
            "con calma", "con paciencia", "con precisión", "sin apuro", "con ternura",
            "con atención", "como si fuera un acertijo", "como si fuera un juego",
            "con un brillo en los ojos", "en voz bajita", "sin perder el hilo", "mirando de cerca",
            "con cuidado", "paso a paso",
        ],
        templates: &[[S, V, O, L, T], [L, S, V, O, T], [S, V, O, T, L]],
    },
    Profile {
        id: "nuve",
        label: "Nuve",
        description: "La tranquila",
        prompt: "Arma tu historia en 30 segundos. Nuve trae calma, luz y suavidad.",
        subjects: &[
            "Nuve", "una nube", "una brisa", "un susurro", "un abrazo", "una estrella lenta",
            "una manta", "un té", "una canción", "una pluma", "una tarde", "un rayo suave",
            "un aroma", "una sonrisa", "un viento", "una ola", "un jardín", "un silencio",
            "un cielo claro", "un sueño",
        ],
        verbs: &[
            "flota", "respira", "acompaña", "calma", "espera", "escucha", "sonríe", "abraza",
            "protege", "suaviza", "ilumina", "descansa", "susurra", "arrulla", "sigue",
            "se desliza", "se queda", "se acomoda", "late", "brilla",
        ],
        objects: &[
            "una paz", "una luz tibia", "una promesa", "una melodía", "un momento",
            "un secreto bueno", "una palabra suave", "un sueño corto", "una idea bonita",
            "un recuerdo", "una chispa", "una caricia", "un refugio", "una risa", "un color",
            "una señal amable", "un camino", "una nube pequeñita",
        ],
        places: &[
            "en la tarde", "en el cielo", "en un jardín", "cerca del mar", "bajo una manta",
            "en una siesta", "en una ventana", "entre nubes", "en una vereda", "sobre una colina",
            "en una hamaca", "junto a una fogata", "en un patio", "en un balcón",
            "en un rincón de sol",
        ],
        tones: &[
            "despacito", "con dulzura", "sin hacer ruido", "con una sonrisa", "con calma",
            "como una canción", "como una brisa", "sin apuro", "con ternura", "casi en secreto",
            "con luz", "con cariño", "respirando hondo", "dejando que pase",
        ],
        templates: &[[S, V, O, L, T], [T, S, V, O, L], [L, T, S, V, O]],
    },
    Profile {
        id: "nuveciela",
        label: "Nuveciela",
        description: "La fuerte",
        prompt: "Arma tu historia en 30 segundos. Nuveciela es fuerza, decisión y corazón.",
        subjects: &[
            "Nuveciela", "una guardiana", "una tormenta", "una amiga leal", "un escudo",
            "una montaña", "un juramento", "una chispa valiente", "una puerta pesada",
            "una voz firme", "un faro", "un paso gigante", "un corazón", "una bandera",
            "una cuerda", "un trueno", "una llama", "una promesa", "un puente", "una elección",
        ],
        verbs: &[
            "enfrenta", "protege", "resiste", "levanta", "decide", "defiende", "salta", "corre",
            "rompe", "abre", "sostiene", "avanza", "se planta", "guarda", "salva", "empuja",
            "acompaña", "cambia", "grita", "abraza",
        ],
        objects: &[
            "un peligro", "una llave", "un mensaje", "un camino difícil", "una luz fuerte",
            "una idea clara", "una salida", "una victoria", "una verdad", "un secreto", "un plan",
            "una señal", "un puente nuevo", "una oportunidad", "una historia valiente",
            "un paso adelante", "una decisión",
        ],
        places: &[
            "en la noche", "bajo la lluvia", "en el bosque", "en la cima", "sobre un puente",
            "en una plaza vacía", "en una puerta vieja", "entre sombras",
            "en un camino de piedras", "junto a un faro", "en un pasillo oscuro",
            "en una escalera", "frente a un espejo",
        ],
        tones: &[
            "con valentía", "sin dudar", "con el corazón firme", "a toda velocidad", "con fuerza",
            "como un trueno", "sin mirar atrás", "con una risa enorme", "con decisión",
            "sin miedo", "con una chispa", "con cuidado pero firme", "mirando al frente",
        ],
        templates: &[[S, V, O, L, T], [T, S, V, O, L], [S, V, L, O, T]],
    },
    Profile {
        id: "lunaria",
        label: "Lunaria",
        description: "La inventora",
        prompt: "Arma tu historia en 30 segundos. Lunaria inventa cosas raras y geniales.",
        subjects: &[
            "Lunaria", "un robot", "un engranaje", "una antena", "un telescopio", "una máquina",
            "un rayo", "un dron", "un chip", "una palanca", "un imán", "un botón misterioso",
            "una lámpara", "un cable", "una rueda", "un plano", "un motor", "un casco",
            "una alarma", "un láser",
        ],
        verbs: &[
            "inventa", "construye", "mezcla", "prueba", "enciende", "calibra", "programa",
            "transforma", "ajusta", "conecta", "desarma", "arma", "tunea", "repara", "suelta",
            "activa", "descarga", "cambia", "explora", "experimenta",
        ],
        objects: &[
            "un prototipo", "una fórmula", "un truco", "un mapa holográfico", "una chispa azul",
            "un plan secreto", "un mensaje codificado", "una idea imposible",
            "una llave magnética", "un motor pequeño", "un casco brillante", "una nube eléctrica",
            "un cristal", "una pantalla", "un interruptor", "una brújula rara", "un portal",
            "un dron curioso", "un invento nuevo",
        ],
        places: &[
            "en el taller", "en un laboratorio", "en la luna", "en un garaje secreto",
            "en una cueva eléctrica", "en una mesa llena de tornillos", "bajo una luz violeta",
            "entre cables", "en una sala de pruebas", "en un pasillo futurista", "en una torre",
            "dentro de una caja", "sobre una mesa", "en una azotea",
        ],
        tones: &[
            "con curiosidad", "como una científica", "con una risa rara", "a toda velocidad",
            "con brillo en los ojos", "sin parar", "con cuidado", "probando otra vez",
            "como si fuera magia", "con un click", "con paciencia", "con un zumbido",
            "con una idea loca",
        ],
        templates: &[[S, V, O, L, T], [L, S, V, O, T], [T, S, V, L, O]],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup_case_insensitive() {
        assert_eq!(profile("Lunaria").map(|p| p.id), Some("lunaria"));
        assert_eq!(profile(" NUVE ").map(|p| p.label), Some("Nuve"));
        assert!(profile("ghost").is_none());
    }

    #[test]
    fn test_every_profile_has_every_role() {
        for p in &PROFILES {
            for role in Role::ALL {
                assert!(!p.words(role).is_empty(), "{} lacks {:?}", p.id, role);
            }
            // Templates use each role exactly once
            for template in p.templates {
                let mut seen = [false; 5];
                for role in template {
                    assert!(!seen[role.index()]);
                    seen[role.index()] = true;
                }
            }
        }
    }
}
